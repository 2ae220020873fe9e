use std::io::{BufRead, Write};

use crate::survey::*;

/// Asks the unanswered questions of the session, one line per answer.
///
/// Answers that are not numbers or fall outside of the scale are asked
/// again. The end of the input stops the questions: the answers recorded
/// so far are kept in the session.
pub fn run_interactive<R: BufRead, W: Write>(
    session: &mut Session,
    input: &mut R,
    output: &mut W,
) -> SurveyResult<()> {
    let scale = session.questionnaire().instrument().scale.clone();
    let instrument_name = session.questionnaire().instrument().name.clone();
    info!("{}: starting the questions", instrument_name);

    while let Some(question) = session.current().cloned() {
        let total = session.questionnaire().len();
        let position = session
            .questionnaire()
            .questions()
            .iter()
            .position(|q| q.id == question.id)
            .map(|p| p + 1)
            .unwrap_or(0);
        writeln!(output, "Question {} of {}", position, total).context(TerminalSnafu {})?;
        writeln!(output, "{}", question.text).context(TerminalSnafu {})?;
        for p in scale.points() {
            writeln!(output, "  {}: {}", p, scale.label(p).unwrap_or(""))
                .context(TerminalSnafu {})?;
        }
        write!(output, "> ").context(TerminalSnafu {})?;
        output.flush().context(TerminalSnafu {})?;

        let mut line = String::new();
        let read = input.read_line(&mut line).context(TerminalSnafu {})?;
        if read == 0 {
            let (answered, total) = session.progress();
            warn!(
                "{}: end of input after {} of {} questions",
                instrument_name, answered, total
            );
            writeln!(output).context(TerminalSnafu {})?;
            break;
        }

        match line.trim().parse::<u32>() {
            Ok(score) => match session.answer(score) {
                Ok(qid) => debug!("run_interactive: question {} answered {}", qid, score),
                Err(e @ ProfileErrors::InvalidScore { .. }) => {
                    writeln!(output, "{}", e).context(TerminalSnafu {})?;
                }
                Err(e) => {
                    return Err(e).context(ScoringSnafu {
                        instrument: &instrument_name,
                    });
                }
            },
            Err(_) => {
                writeln!(
                    output,
                    "Please answer with a number between {} and {}",
                    scale.min, scale.max
                )
                .context(TerminalSnafu {})?;
            }
        }
    }
    Ok(())
}
