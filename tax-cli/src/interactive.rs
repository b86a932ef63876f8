use std::io::Write;

use anyhow::Result;
use tax_core::{CalculationError, CalculationSession, ScheduleProvider};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::display::{LOADING_LINE, render_state};
use crate::utils::{is_quit_command, normalize_income_input};

/// Prompts for income and tax year until the user quits or input ends.
///
/// Pressing Enter on the tax year prompt submits with the year shown in
/// brackets (the last one used), so repeated calculations for one year only
/// need the income. With no year remembered, a blank answer is submitted as
/// is and reported as missing input.
pub async fn run<P, R, W>(
    session: &CalculationSession<P>,
    mut input: R,
    mut out: W,
) -> Result<()>
where
    P: ScheduleProvider,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut last_year: Option<String> = None;

    writeln!(out, "Enter 'quit' to exit.")?;
    loop {
        let Some(income) = prompt(&mut input, &mut out, "Annual income: ").await? else {
            break;
        };
        if is_quit_command(&income) {
            break;
        }

        let year_prompt = match &last_year {
            Some(year) => format!("Tax year [{year}]: "),
            None => "Tax year: ".to_string(),
        };
        let Some(year) = prompt(&mut input, &mut out, &year_prompt).await? else {
            break;
        };
        if is_quit_command(&year) {
            break;
        }
        let year = match (year.trim(), &last_year) {
            ("", Some(last)) => last.clone(),
            (typed, _) => typed.to_string(),
        };

        writeln!(out, "{LOADING_LINE}")?;
        match session.submit(&normalize_income_input(&income), &year).await {
            Ok(_) => {
                last_year = Some(year);
            }
            Err(CalculationError::Superseded { request_id }) => {
                debug!(request_id, "ignoring superseded result");
                continue;
            }
            Err(_) => {}
        }

        if let Some(text) = render_state(&session.state()) {
            writeln!(out, "{}", text.trim_end())?;
        }
        writeln!(out)?;
    }

    Ok(())
}

/// Writes `label` and reads one line. `None` at end of input.
async fn prompt<R, W>(input: &mut R, out: &mut W, label: &str) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write!(out, "{label}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
