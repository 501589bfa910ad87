//! Operator console: line commands in, form snapshots out.

use std::fmt::Write as _;
use thiserror::Error;

use crate::form::{Field, FormAction, FormSession, TextField};
use crate::notify::{Notification, NotificationKind};
use crate::reference::{Id, ReferenceDataStore, ReferenceList};

pub const HELP: &str = "\
Commands:
  show                          current form
  set <field> <value>           first_name | last_name | mobile_no | email
  role add|rm <id>              select / remove a role
  sector <id> | sector none     pick / clear the sector
  supervisor add|rm <id>        select / remove a supervisor
  roles | sectors | supervisors list options
  submit                        validate and save
  reload                        fetch the record again
  dismiss                       close the notification
  cancel                        leave without saving";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Action(FormAction),
    Show,
    Options(ReferenceList),
    Submit,
    Reload,
    Dismiss,
    Cancel,
    Help,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("unknown field '{0}'")]
    UnknownField(String),
}

fn id_arg(arg: Option<&str>, usage: &'static str) -> Result<Id, CommandError> {
    arg.map(Id::from).ok_or(CommandError::Usage(usage))
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let mut args = rest.split_whitespace();

    match head.to_lowercase().as_str() {
        "" | "show" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "submit" | "save" => Ok(Command::Submit),
        "reload" => Ok(Command::Reload),
        "dismiss" => Ok(Command::Dismiss),
        "cancel" | "quit" | "exit" | "q" => Ok(Command::Cancel),
        "roles" => Ok(Command::Options(ReferenceList::Roles)),
        "sectors" => Ok(Command::Options(ReferenceList::Sectors)),
        "supervisors" => Ok(Command::Options(ReferenceList::Supervisors)),
        "set" => {
            const USAGE: &str = "set <field> <value>";
            let (name, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            if name.is_empty() {
                return Err(CommandError::Usage(USAGE));
            }
            let field = TextField::parse(name).ok_or_else(|| CommandError::UnknownField(name.to_string()))?;
            Ok(Command::Action(FormAction::Edit(field, value.trim().to_string())))
        }
        "role" => {
            const USAGE: &str = "role add|rm <id>";
            match args.next() {
                Some("add") => Ok(Command::Action(FormAction::SelectRole(id_arg(args.next(), USAGE)?))),
                Some("rm") | Some("remove") => Ok(Command::Action(FormAction::RemoveRole(id_arg(args.next(), USAGE)?))),
                _ => Err(CommandError::Usage(USAGE)),
            }
        }
        "sector" => match args.next() {
            Some("none") => Ok(Command::Action(FormAction::ClearSector)),
            Some(id) => Ok(Command::Action(FormAction::SelectSector(Id::from(id)))),
            None => Err(CommandError::Usage("sector <id> | sector none")),
        },
        "supervisor" => {
            const USAGE: &str = "supervisor add|rm <id>";
            match args.next() {
                Some("add") => Ok(Command::Action(FormAction::SelectSupervisor(id_arg(args.next(), USAGE)?))),
                Some("rm") | Some("remove") => {
                    Ok(Command::Action(FormAction::RemoveSupervisor(id_arg(args.next(), USAGE)?)))
                }
                _ => Err(CommandError::Usage(USAGE)),
            }
        }
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

/// Text snapshot of the form, with field errors inline.
pub fn render_form(session: &FormSession) -> String {
    let state = session.state();
    let derived = session.derived();
    let errors = session.errors();
    let mut out = String::new();

    let mut line = |label: &str, value: &str, field: Field| {
        let _ = writeln!(out, "{:<13} {}", format!("{}:", label), value);
        if let Some(msg) = errors.get(field) {
            let _ = writeln!(out, "{:<13} ! {}", "", msg);
        }
    };

    line("First Name", &state.first_name, Field::FirstName);
    line("Last Name", &state.last_name, Field::LastName);
    line("Mobile Number", &state.mobile_no, Field::MobileNo);
    line("Email", &state.email, Field::Email);

    let roles = if derived.role_labels.is_empty() {
        "Select Roles".to_string()
    } else {
        derived.role_labels.join(", ")
    };
    line("Roles", &roles, Field::Role);

    let sector = match (&state.selected_sector_id, &derived.sector_label) {
        (_, Some(name)) => name.clone(),
        (Some(id), None) => format!("#{}", id),
        (None, None) => "Select Sector".to_string(),
    };
    line("Sector", &sector, Field::Sector);

    if derived.show_supervisors() {
        let supervisors = if derived.supervisor_labels.is_empty() {
            "Select Supervisors".to_string()
        } else {
            derived.supervisor_labels.join(", ")
        };
        line("Supervisors", &supervisors, Field::Supervisors);
    }

    out
}

pub fn render_notification(notification: &Notification) -> String {
    let icon = match notification.kind {
        NotificationKind::Success => "✅",
        NotificationKind::Error => "❌",
    };
    format!("{} {}", icon, notification.message)
}

/// One option per line, marking the ones currently selected.
pub fn render_options(session: &FormSession, list: ReferenceList) -> String {
    let reference: &ReferenceDataStore = session.reference();
    let state = session.state();

    if !reference.is_loaded(list) {
        return if reference.has_failed(list) {
            format!("{} could not be loaded\n", list)
        } else {
            format!("{} still loading\n", list)
        };
    }

    let mark = |selected: bool| if selected { "✓" } else { "○" };
    let mut out = String::new();
    match list {
        ReferenceList::Roles => {
            for role in reference.roles() {
                let approval = if role.needs_approval { " (needs approval)" } else { "" };
                let _ = writeln!(out, "{} {:>4}  {}{}", mark(state.has_role(&role.id)), role.id, role.role_name, approval);
            }
        }
        ReferenceList::Sectors => {
            for (sector, depth) in reference.sector_entries() {
                let selected = state.selected_sector_id.as_ref() == Some(&sector.id);
                let _ = writeln!(
                    out,
                    "{} {:>4}  {}{}",
                    mark(selected),
                    sector.id,
                    "  ".repeat(depth),
                    sector.sector_name
                );
            }
        }
        ReferenceList::Supervisors => {
            for supervisor in reference.supervisors() {
                let _ = writeln!(
                    out,
                    "{} {:>4}  {}",
                    mark(state.has_supervisor(&supervisor.id)),
                    supervisor.id,
                    supervisor.user_name
                );
            }
        }
    }
    out
}
