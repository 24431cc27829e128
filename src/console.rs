// 🖥️ Console - line-oriented command loop
// view / add1 / add2 / import / menu / exit over any BufRead + Write

use crate::error::{Result, SalesError};
use crate::importer::Importer;
use crate::prompt::Prompter;
use crate::records::{SalesList, SalesRecord};
use crate::report::SalesReport;
use crate::store::SalesFile;
use crate::validate;
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::{debug, warn};

pub const TITLE: &str = "SALES DATA IMPORTER";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    View,
    Add1,
    Add2,
    Import,
    Menu,
    Exit,
}

impl Command {
    pub const ALL: [Command; 6] = [
        Command::View,
        Command::Add1,
        Command::Add2,
        Command::Import,
        Command::Menu,
        Command::Exit,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            Command::View => "view",
            Command::Add1 => "add1",
            Command::Add2 => "add2",
            Command::Import => "import",
            Command::Menu => "menu",
            Command::Exit => "exit",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Command::View => "View all sales",
            Command::Add1 => "Add sales by typing sales, year, month, day, and region",
            Command::Add2 => "Add sales by typing sales, date (YYYY-MM-DD), and region",
            Command::Import => "Import sales from file",
            Command::Menu => "Show menu",
            Command::Exit => "Exit program",
        }
    }
}

impl FromStr for Command {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Command::ALL
            .iter()
            .copied()
            .find(|c| c.keyword() == s)
            .ok_or(())
    }
}

pub fn menu_text() -> String {
    let mut text = String::from("COMMAND MENU\n");
    for command in Command::ALL {
        text.push_str(&format!("{:<6} - {}\n", command.keyword(), command.description()));
    }
    text
}

/// One interactive session: the in-memory list plus where it is persisted
pub struct Session {
    pub sales: SalesList,
    pub sales_file: SalesFile,
    pub importer: Importer,
}

impl Session {
    pub fn new(sales: SalesList, sales_file: SalesFile, importer: Importer) -> Self {
        Session {
            sales,
            sales_file,
            importer,
        }
    }

    fn add(&mut self, record: SalesRecord) -> String {
        let message = format!(
            "Sales for {} is added.",
            record.date().format(validate::DATE_FORMAT)
        );
        self.sales.push(record);
        message
    }
}

/// Run the command loop until `exit` or end of input, then save.
pub fn run<R: BufRead, W: Write>(session: &mut Session, prompter: &mut Prompter<R, W>) -> Result<()> {
    prompter.say(format!("{}\n", TITLE))?;
    prompter.say(menu_text())?;

    loop {
        let Some(line) = prompter.read_line("Please enter a command: ")? else {
            debug!("input closed at command prompt");
            prompter.say("")?;
            break;
        };

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(()) => {
                prompter.say("Invalid command. Please try again.\n")?;
                prompter.say(menu_text())?;
                continue;
            }
        };

        match command {
            Command::View => {
                let report = SalesReport::from_records(&session.sales);
                prompter.say(report.render())?;
            }
            Command::Add1 | Command::Add2 => {
                let entered = if command == Command::Add1 {
                    prompter.from_input1()
                } else {
                    prompter.from_input2()
                };
                match entered {
                    Ok(record) => {
                        let message = session.add(record);
                        prompter.say(message)?;
                    }
                    Err(SalesError::InputClosed(what)) => {
                        warn!(what = %what, "input closed while adding sales");
                        prompter.say("\nSale not added.")?;
                        break;
                    }
                    Err(e) => return Err(e),
                }
            }
            Command::Import => import_command(session, prompter)?,
            Command::Menu => prompter.say(menu_text())?,
            Command::Exit => break,
        }
    }

    session.sales_file.save(&session.sales)?;
    prompter.say("Saved sales records.")?;
    prompter.say("Bye!")?;
    Ok(())
}

fn import_command<R: BufRead, W: Write>(session: &mut Session, prompter: &mut Prompter<R, W>) -> Result<()> {
    let Some(file_name) = prompter.read_line("Enter name of file to import: ")? else {
        return Ok(());
    };

    match session.importer.import(&file_name, &mut session.sales) {
        Ok(outcome) => {
            if let Some(preview) = outcome.preview() {
                prompter.say(preview.render())?;
            }
            prompter.say(outcome.message())?;
        }
        // Only this one operation fails; the session keeps running
        Err(e) => {
            warn!(error = %e, file_name = %file_name, "import failed");
            prompter.say(format!("Fail to import sales from '{}': {}", file_name.trim(), e))?;
        }
    }
    Ok(())
}
