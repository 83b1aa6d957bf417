use taskstream_core::{Msg, SiteSelection};

use crate::platform::host::DropSpot;

pub const HELP: &str = "\
Commands:
  next | prev | page <n>        change page
  site <name|NONE>              select a site
  refresh                       reload the current page now
  auto on|off                   toggle automatic reload
  cancel <job>                  run the row action of a job
  show <job>                    expand or collapse a job row
  download <job> <file>         download an output file into the browser directory
  drag <job> [file]             inject code for a job or file into the kernel
  drop <job> <file>             drag an output file onto the file browser
  yes | no                      answer an open question
  dismiss                       close the dialog
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Msg(Msg),
    /// A drag released at a specific spot.
    Drag { spot: DropSpot, msg: Msg },
    Answer(bool),
    Help,
    Quit,
    Empty,
    Invalid(String),
}

pub fn parse(line: &str) -> Command {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Command::Empty;
    };
    let args: Vec<&str> = words.collect();

    match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("next", []) => Command::Msg(Msg::NextPageClicked),
        ("prev", []) => Command::Msg(Msg::PrevPageClicked),
        ("page", [n]) => match n.parse::<u32>() {
            Ok(page) if page >= 1 => Command::Msg(Msg::PageSelected(page)),
            _ => Command::Invalid(format!("not a page number: {n}")),
        },
        ("site", [name]) => Command::Msg(Msg::SiteSelected(SiteSelection::from_label(name))),
        ("refresh" | "r", []) => Command::Msg(Msg::RefreshClicked),
        ("auto", ["on"]) => Command::Msg(Msg::AutoReloadToggled(true)),
        ("auto", ["off"]) => Command::Msg(Msg::AutoReloadToggled(false)),
        ("cancel", [job]) => Command::Msg(Msg::RowActionClicked {
            job_id: job.to_string(),
        }),
        ("show" | "toggle", [job]) => Command::Msg(Msg::RowToggled {
            job_id: job.to_string(),
        }),
        ("download", [job, file]) => Command::Msg(Msg::DownloadClicked {
            job_id: job.to_string(),
            file: file.to_string(),
        }),
        ("drag", [job]) => drag(DropSpot::Notebook, job, None),
        ("drag", [job, file]) => drag(DropSpot::Notebook, job, Some(*file)),
        ("drop", [job, file]) => drag(DropSpot::Browser, job, Some(*file)),
        ("yes" | "y", []) => Command::Answer(true),
        ("no", []) => Command::Answer(false),
        ("dismiss" | "ok", []) => Command::Msg(Msg::ModalDismissed),
        ("help" | "?", []) => Command::Help,
        ("quit" | "q" | "exit", []) => Command::Quit,
        _ => Command::Invalid(format!("unknown command: {}", line.trim())),
    }
}

fn drag(spot: DropSpot, job: &str, file: Option<&str>) -> Command {
    Command::Drag {
        spot,
        msg: Msg::DragRequested {
            job_id: job.to_string(),
            file: file.map(str::to_string),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_navigation() {
        assert_eq!(parse("next"), Command::Msg(Msg::NextPageClicked));
        assert_eq!(parse("  PREV "), Command::Msg(Msg::PrevPageClicked));
        assert_eq!(parse("page 3"), Command::Msg(Msg::PageSelected(3)));
        assert!(matches!(parse("page 0"), Command::Invalid(_)));
        assert!(matches!(parse("page x"), Command::Invalid(_)));
        assert_eq!(
            parse("site JUDAC"),
            Command::Msg(Msg::SiteSelected(SiteSelection::Site("JUDAC".to_string())))
        );
        assert_eq!(
            parse("site NONE"),
            Command::Msg(Msg::SiteSelected(SiteSelection::NoSite))
        );
    }

    #[test]
    fn parses_row_commands() {
        assert_eq!(
            parse("download a1 stdout"),
            Command::Msg(Msg::DownloadClicked {
                job_id: "a1".to_string(),
                file: "stdout".to_string(),
            })
        );
        assert_eq!(
            parse("drag a1"),
            Command::Drag {
                spot: DropSpot::Notebook,
                msg: Msg::DragRequested {
                    job_id: "a1".to_string(),
                    file: None,
                },
            }
        );
        assert_eq!(
            parse("drop a1 stderr"),
            Command::Drag {
                spot: DropSpot::Browser,
                msg: Msg::DragRequested {
                    job_id: "a1".to_string(),
                    file: Some("stderr".to_string()),
                },
            }
        );
    }

    #[test]
    fn parses_session_commands() {
        assert_eq!(parse(""), Command::Empty);
        assert_eq!(parse("y"), Command::Answer(true));
        assert_eq!(parse("no"), Command::Answer(false));
        assert_eq!(parse("auto off"), Command::Msg(Msg::AutoReloadToggled(false)));
        assert_eq!(parse("quit"), Command::Quit);
        assert!(matches!(parse("drop a1"), Command::Invalid(_)));
        assert!(matches!(parse("launch"), Command::Invalid(_)));
    }
}
