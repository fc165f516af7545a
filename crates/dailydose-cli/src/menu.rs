//! The interactive menu loop.
//!
//! Stdin is read on a dedicated thread and forwarded over a channel, so a
//! pending read never keeps the runtime alive after the user leaves.

use std::future::Future;
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use dailydose_core::{AppError, Category};
use tokio::sync::mpsc;
use tracing::debug;

use crate::pipeline::{Pipeline, Presenter};
use crate::ui;

const UNEXPECTED_CONTEXT: &str = "Unexpected error in main loop";
const INVALID_CHOICE_PAUSE: Duration = Duration::from_secs(2);

/// One entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Fetch(Category),
    Everything,
    Stats,
    Exit,
    Invalid,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Self {
        match input.trim() {
            "1" => MenuChoice::Fetch(Category::Advice),
            "2" => MenuChoice::Fetch(Category::Book),
            "3" => MenuChoice::Fetch(Category::Quote),
            "4" => MenuChoice::Fetch(Category::Dog),
            "5" => MenuChoice::Everything,
            "6" => MenuChoice::Stats,
            "7" => MenuChoice::Exit,
            _ => MenuChoice::Invalid,
        }
    }

    /// Choices whose output stays on screen until Enter is pressed.
    pub fn waits_for_enter(&self) -> bool {
        matches!(
            self,
            MenuChoice::Fetch(_) | MenuChoice::Everything | MenuChoice::Stats
        )
    }
}

/// Lines typed by the user; `None` once stdin is closed.
struct InputLines {
    rx: mpsc::UnboundedReceiver<io::Result<String>>,
}

impl InputLines {
    fn spawn() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                let failed = line.is_err();
                if tx.send(line).is_err() || failed {
                    break;
                }
            }
        });
        Self { rx }
    }

    async fn next(&mut self) -> Option<io::Result<String>> {
        self.rx.recv().await
    }
}

/// Ctrl-C listener held for the whole session.
///
/// The handler is installed once; an interrupt that arrives while nothing is
/// being guarded is kept and ends the next guarded wait.
struct Interrupt {
    #[cfg(unix)]
    signal: tokio::signal::unix::Signal,
    #[cfg(windows)]
    signal: tokio::signal::windows::CtrlC,
}

impl Interrupt {
    fn listen() -> io::Result<Self> {
        #[cfg(unix)]
        let signal =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;
        #[cfg(windows)]
        let signal = tokio::signal::windows::ctrl_c()?;
        Ok(Self { signal })
    }

    async fn received(&mut self) {
        if self.signal.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }

    /// Resolves to `None` if Ctrl-C arrives before `fut` completes.
    async fn guard<F: Future>(&mut self, fut: F) -> Option<F::Output> {
        tokio::select! {
            out = fut => Some(out),
            () = self.received() => None,
        }
    }
}

fn prompt(text: &str) -> io::Result<()> {
    print!("{}", text);
    io::stdout().flush()
}

fn farewell() {
    println!("Thank you for using Daily Motivation Hub! 🌟");
    println!("Stay motivated and have a great day! 💪");
}

fn goodbye() {
    println!("\n👋 Goodbye! Thanks for using the Hub.");
}

async fn dispatch(
    pipeline: &Pipeline,
    presenter: &dyn Presenter,
    choice: MenuChoice,
) -> Result<(), AppError> {
    match choice {
        MenuChoice::Fetch(category) => {
            pipeline.run_category(category, presenter).await?;
        }
        MenuChoice::Everything => {
            pipeline.run_everything(presenter).await?;
        }
        MenuChoice::Stats => {
            pipeline.statistics(presenter);
        }
        MenuChoice::Exit | MenuChoice::Invalid => {}
    }
    Ok(())
}

/// Runs the menu until the user exits, closes stdin or presses Ctrl-C.
///
/// An unexpected error is written to the error log and ends the session.
pub async fn run_menu(pipeline: &Pipeline, presenter: &dyn Presenter) -> io::Result<()> {
    let mut interrupt = Interrupt::listen()?;
    let mut input = InputLines::spawn();
    ui::print_welcome();

    loop {
        ui::print_menu();
        prompt("Enter your choice (1-7): ")?;

        let line = match interrupt.guard(input.next()).await {
            None => {
                goodbye();
                return Ok(());
            }
            Some(None) => {
                println!();
                farewell();
                return Ok(());
            }
            Some(Some(Err(e))) => {
                pipeline.envelope().record_unexpected(UNEXPECTED_CONTEXT, &e);
                println!("❌ An unexpected error occurred: {}", e);
                return Ok(());
            }
            Some(Some(Ok(line))) => line,
        };

        let choice = MenuChoice::parse(&line);
        debug!(?choice, "Menu choice");

        match choice {
            MenuChoice::Exit => {
                farewell();
                return Ok(());
            }
            MenuChoice::Invalid => {
                println!("WARNING: Invalid choice. Only numbers from 1 to 7 are allowed!");
                if interrupt
                    .guard(tokio::time::sleep(INVALID_CHOICE_PAUSE))
                    .await
                    .is_none()
                {
                    goodbye();
                    return Ok(());
                }
                continue;
            }
            _ => {}
        }

        match interrupt.guard(dispatch(pipeline, presenter, choice)).await {
            None => {
                goodbye();
                return Ok(());
            }
            Some(Err(e)) => {
                pipeline.envelope().record_unexpected(UNEXPECTED_CONTEXT, &e);
                println!("❌ An unexpected error occurred: {}", e.user_message());
                return Ok(());
            }
            Some(Ok(())) => {}
        }

        if choice.waits_for_enter() {
            prompt("\nPress Enter to continue...")?;
            match interrupt.guard(input.next()).await {
                None => {
                    goodbye();
                    return Ok(());
                }
                Some(None) => {
                    println!();
                    farewell();
                    return Ok(());
                }
                Some(Some(_)) => println!("\n\n"),
            }
        }
    }
}
