fn main() -> anyhow::Result<()> {
    qa_assistant::cli::run()
}
