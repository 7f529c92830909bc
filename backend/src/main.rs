fn main() -> anyhow::Result<()> {
  songbook_lib::run()
}
