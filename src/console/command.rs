use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::profile::{Allergen, ProfileField, ProfileFieldError};
use crate::session::{View, Workflow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Profile(ProfileField),
    Allergy(Allergen),
    Ingredients,
    Photo(PathBuf),
    Scan,
    Plan,
    Pdf,
    View(View),
    Show,
    Status,
    Cancel(Workflow),
    Health,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command `{0}`; try `help`")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Field(#[from] ProfileFieldError),

    #[error("{0}")]
    Invalid(String),
}

pub const HELP: &str = "\
commands:
  profile <field> <value>   age | sex | diet | goal | meals | allergies
  allergy <name>            toggle an allergy
  ingredients               type ingredients, one per line, end with `.`
  photo <path>              select a photo
  scan                      analyze the selected photo
  plan                      generate a meal plan
  pdf                       export the meal plan as PDF
  view <name>               scan | dashboard | grocery-guide | profile
  show                      render the active view
  status                    workflow states
  cancel <workflow>         ingredients | photo | plan | pdf
  health                    probe the analysis service
  help | quit";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let required = |usage: &'static str| {
            if rest.is_empty() {
                Err(CommandError::Usage(usage))
            } else {
                Ok(rest)
            }
        };

        match verb.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "profile" => {
                let rest = required("profile <field> <value>")?;
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Ok(Command::Profile(ProfileField::parse(field, value)?))
            }
            "allergy" => Ok(Command::Allergy(required("allergy <name>")?.parse()?)),
            "ingredients" => Ok(Command::Ingredients),
            "photo" => Ok(Command::Photo(PathBuf::from(required("photo <path>")?))),
            "scan" => Ok(Command::Scan),
            "plan" => Ok(Command::Plan),
            "pdf" => Ok(Command::Pdf),
            "view" => required("view <name>")?
                .parse()
                .map(Command::View)
                .map_err(CommandError::Invalid),
            "show" => Ok(Command::Show),
            "status" => Ok(Command::Status),
            "cancel" => required("cancel <workflow>")?
                .parse()
                .map(Command::Cancel)
                .map_err(CommandError::Invalid),
            "health" => Ok(Command::Health),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
