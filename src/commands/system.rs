use colored::Colorize;
use std::io::{self, Write};

pub fn print_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "\n🥗 Nutrition Assistant Commands:")?;
    writeln!(out, "  Just type your dietary question")?;
    writeln!(out, "  Examples:")?;
    writeln!(out, "    - how much potassium is in a banana?")?;
    writeln!(out, "    - is quinoa a good source of protein?")?;
    writeln!(out)?;

    writeln!(out, "🍎 Food Commands:")?;
    writeln!(out, "  foods                       - List foods in the knowledge base")?;
    writeln!(out, "  alternatives <food>         - Find healthier alternatives")?;
    writeln!(out, "  diet <food>, <food>, ...    - Analyze a set of foods")?;
    writeln!(out, "  (a line ending in '?' is always answered as a question)")?;
    writeln!(out)?;

    writeln!(out, "⚙️ System Commands:")?;
    writeln!(out, "  help  - Show this help menu")?;
    writeln!(out, "  exit  - Exit the program")?;
    writeln!(out)?;
    Ok(())
}

pub fn print_goodbye<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", "👋 Thanks for using Nutrition Assistant!".bright_green())
}
