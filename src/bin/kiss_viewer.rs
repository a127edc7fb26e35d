use kissview::cli::run_kiss_viewer_cli;

fn main() -> anyhow::Result<()> {
    run_kiss_viewer_cli()
}
