//! Line commands typed at the console, mapped onto list intents.

use shared::domain::ItemId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Search(String),
    SubmitSearch,
    Scroll,
    Toggle(ItemId),
    Drag { dragged: ItemId, target: ItemId },
    Reload,
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  search <text>     type into the search box (debounced); `search` alone clears it
  enter             commit the search box now
  scroll            scroll to the bottom of the list
  toggle <id>       check or uncheck an item
  drag <id> <onto>  drag an item and drop it onto another
  reload            reload the first page of the current search
  show              print the list
  help              this text
  quit              exit";

pub fn parse_command(line: &str) -> Result<ConsoleCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "search" | "s" | "/" => Ok(ConsoleCommand::Search(rest.to_string())),
        "enter" => Ok(ConsoleCommand::SubmitSearch),
        "scroll" | "more" => Ok(ConsoleCommand::Scroll),
        "toggle" | "t" => Ok(ConsoleCommand::Toggle(parse_id(rest)?)),
        "drag" | "d" => {
            let mut ids = rest.split_whitespace();
            let (Some(dragged), Some(target), None) = (ids.next(), ids.next(), ids.next()) else {
                return Err("usage: drag <id> <onto>".to_string());
            };
            Ok(ConsoleCommand::Drag {
                dragged: parse_id(dragged)?,
                target: parse_id(target)?,
            })
        }
        "reload" => Ok(ConsoleCommand::Reload),
        "show" | "ls" | "" => Ok(ConsoleCommand::Show),
        "help" | "?" => Ok(ConsoleCommand::Help),
        "quit" | "q" | "exit" => Ok(ConsoleCommand::Quit),
        other => Err(format!("unknown command '{other}' (try `help`)")),
    }
}

fn parse_id(raw: &str) -> Result<ItemId, String> {
    raw.trim()
        .parse::<i64>()
        .map(ItemId)
        .map_err(|_| format!("'{raw}' is not an item id"))
}
