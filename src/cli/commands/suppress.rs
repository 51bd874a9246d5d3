use anyhow::{Context, Result};

use super::super::args::SuppressCommand;
use super::{
    helper::{finish, load_session, project_config},
    {CommandKind, CommandResult, CommandSummary, SuppressSummary},
};

pub fn suppress(cmd: SuppressCommand) -> Result<CommandResult> {
    let (_, root_dir) = project_config(&cmd.common)?;
    let mut session = load_session(&cmd.session, root_dir)?;

    let disabled = session.disable_signatures(&cmd.signatures);
    session
        .save(&cmd.session)
        .with_context(|| format!("Failed to save session {}", cmd.session.display()))?;

    let summary = SuppressSummary {
        requested: cmd.signatures.len(),
        disabled,
        session: cmd.session.clone(),
    };
    Ok(finish(CommandKind::Suppress, CommandSummary::Suppress(summary), Vec::new(), false))
}
