fn main() -> anyhow::Result<()> {
    practice_engine::run()
}
