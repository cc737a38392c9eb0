//! The `preptrack take` command: an interactive exam session.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;

use preptrack_core::countdown::Countdown;
use preptrack_core::{
    Advance, ExamApi, ExamSession, SelectOutcome, SessionError, SessionOptions, SessionState,
};

use super::result::print_result;
use super::{connect, session_failure};

type Input = Lines<BufReader<Stdin>>;

pub async fn execute(exam_id: String, init: bool, config_path: Option<PathBuf>) -> Result<()> {
    let ctx = connect(config_path.as_deref())?;
    let is_init = init || ctx.config.is_init;

    let api: Arc<dyn ExamApi> = Arc::new(ctx.client);
    let mut session = ExamSession::new(api, exam_id, SessionOptions { is_init });
    info!(session = %session.id(), exam_id = %session.exam_id(), is_init, "starting exam");
    match session.start().await {
        Ok(()) if session.state() == SessionState::SubmittingFinal => {
            let outcome = session.submit().await.map(|_| ());
            settle(&session, outcome)?;
        }
        Ok(()) => {}
        // Only transport failures are worth retrying; the server's own answer stands.
        Err(e) if is_transport(&e) => settle(&session, Err(e))?,
        Err(e) => return Err(session_failure(e)),
    }

    println!("Enter an option number, s to skip, q to quit.");

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match session.state() {
            SessionState::PresentingQuestion => present(&mut session, &mut input).await?,
            SessionState::AnswerSelected => continue_or_quit(&mut session, &mut input).await?,
            SessionState::LoadingInitial | SessionState::FetchingNextPage => {
                if confirm_retry(&mut input).await? {
                    let outcome = session.retry_fetch().await.map(|_| ());
                    settle(&session, outcome)?;
                } else {
                    session.exit();
                }
            }
            SessionState::SubmittingFinal => {
                if confirm_retry(&mut input).await? {
                    let outcome = session.submit().await.map(|_| ());
                    settle(&session, outcome)?;
                } else {
                    session.exit();
                }
            }
            SessionState::Finished => break,
        }
    }

    match session.result() {
        Some(result) => print_result(result),
        None => println!("Exam abandoned. Nothing was submitted."),
    }
    Ok(())
}

/// Show the current question and wait for a choice or the countdown.
async fn present(session: &mut ExamSession, input: &mut Input) -> Result<()> {
    let Some(question) = session.current_question() else {
        return Err(session_failure(SessionError::NoExamLoaded));
    };
    let allowed = session.countdown().unwrap_or_default();
    let options: Vec<String> = question.options().iter().map(|a| a.id.clone()).collect();

    println!(
        "\nQuestion {}/{} [{}] ({}s)",
        session.question_number(),
        session.total_questions(),
        question.difficulty,
        allowed.as_secs()
    );
    println!("{}", question.prompt);
    for (i, answer) in question.options().iter().enumerate() {
        println!("  {}) {}", i + 1, answer.text);
    }

    let mut countdown = Countdown::start(allowed);
    loop {
        let line = tokio::select! {
            line = input.next_line() => line?,
            _ = countdown.expired() => {
                println!("Time's up.");
                let outcome = session.countdown_expired().await.map(|_| ());
                return settle(session, outcome);
            }
        };

        let Some(line) = line else {
            session.exit();
            return Ok(());
        };

        match line.trim() {
            "q" => {
                session.exit();
                return Ok(());
            }
            "s" => {
                let outcome = session.skip().await;
                return settle(session, outcome.map(|_| ()));
            }
            choice => match choice.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => {
                    let outcome = session
                        .select_answer(&options[n - 1])
                        .map_err(session_failure)?;
                    report_choice(session, &outcome);
                    return Ok(());
                }
                _ => println!(
                    "Enter 1-{}, s to skip, or q to quit ({}s left).",
                    options.len(),
                    countdown.remaining().as_secs()
                ),
            },
        }
    }
}

fn report_choice(session: &ExamSession, outcome: &SelectOutcome) {
    let SelectOutcome::Accepted {
        correct,
        correct_answer_id,
    } = outcome
    else {
        return;
    };
    if *correct {
        println!("Correct!");
        return;
    }
    let answer = session
        .current_question()
        .map(|q| q.correct_answer.text.clone())
        .unwrap_or_else(|| correct_answer_id.clone());
    println!("Incorrect. The answer is: {answer}");
}

async fn continue_or_quit(session: &mut ExamSession, input: &mut Input) -> Result<()> {
    println!("Press Enter for the next question, or q to quit.");
    match input.next_line().await? {
        Some(line) if line.trim() == "q" => session.exit(),
        Some(_) => {
            let outcome = session.advance().await;
            if let Ok(Advance::NextPage) = &outcome {
                info!(question = session.question_number(), "next page loaded");
            }
            settle(session, outcome.map(|_| ()))?;
        }
        None => session.exit(),
    }
    Ok(())
}

async fn confirm_retry(input: &mut Input) -> Result<bool> {
    println!("Retry? [Y/n]");
    Ok(match input.next_line().await? {
        Some(line) => !line.trim().eq_ignore_ascii_case("n"),
        None => false,
    })
}

fn is_transport(e: &SessionError) -> bool {
    matches!(e, SessionError::Api(api) if api.is_transport())
}

/// Report a failed step the session can recover from; fail on anything else.
fn settle(session: &ExamSession, outcome: Result<(), SessionError>) -> Result<()> {
    match outcome {
        Ok(()) => Ok(()),
        Err(e) => match session.state() {
            SessionState::LoadingInitial
            | SessionState::FetchingNextPage
            | SessionState::SubmittingFinal => {
                eprintln!("{}", e.user_message());
                Ok(())
            }
            _ => Err(session_failure(e)),
        },
    }
}
