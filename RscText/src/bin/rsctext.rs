fn main() -> anyhow::Result<()> {
    rsctext::cli::run_cli()
}
