use anyhow::Result;

fn main() -> Result<()> {
    quest_cli::main_entry()
}
