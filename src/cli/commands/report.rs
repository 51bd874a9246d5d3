use anyhow::Result;

use super::super::args::ReportCommand;
use super::check::report_parameters;
use super::{
    helper::{finish, load_session, project_config},
    {CommandKind, CommandResult, CommandSummary, ReportSummary},
};
use crate::config::OutputType;
use crate::report::generate_report;

pub fn report(cmd: ReportCommand) -> Result<CommandResult> {
    let (_, root_dir) = project_config(&cmd.common)?;
    let session = load_session(&cmd.session, root_dir.clone())?;

    let format = cmd.format.map(OutputType::from);
    let params = match &cmd.output {
        Some(output) => report_parameters(session.parameters(), output, format),
        None => {
            let mut params = session.parameters().clone();
            if let Some(format) = format {
                params.output_type = format;
            }
            params
        }
    };
    let path = generate_report(session.issues(), &params, &root_dir)?;

    let summary = ReportSummary {
        path,
        issue_count: session.enabled_issues().count(),
    };
    Ok(finish(CommandKind::Report, CommandSummary::Report(summary), Vec::new(), false))
}
