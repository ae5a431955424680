fn main() -> anyhow::Result<()> {
    kira_runindex::cli::run::entry()
}
