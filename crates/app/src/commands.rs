use std::io::Write;

use services::{AppServices, SignUpOutcome};
use shelf_core::model::{BookDraft, ReadingGoalDraft, ReadingLog};
use shelf_core::progress::{BookWithProgress, GoalPace, pages_read_by_book, pages_read_for};
use thiserror::Error;
use ui::vm::{
    BookCardBody, BookCardVm, BookDetailVm, BookDetailsFormVm, GoalCardVm, Notice,
    ProfileStatsVm, format_date, map_book_cards,
};
use ui::{LibraryDocument, render_library_page};

use crate::cli::{AddArgs, Command, EditArgs, GoalCommand, LogArgs, ProfileCommand};

pub type CommandResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CommandError {
    #[error("progress can only be logged for books you are reading (\"{0}\" is not)")]
    NotReading(String),
}

fn notice(out: &mut dyn Write, notice: &Notice) -> CommandResult {
    writeln!(out, "{}", notice.text)?;
    Ok(())
}

/// One-line summary of a card body, matching what the card shows.
fn body_summary(body: &BookCardBody) -> String {
    match body {
        BookCardBody::Progress {
            percent,
            pages_read,
            total_pages,
        } => format!("{percent}% ({pages_read} / {total_pages} pages)"),
        BookCardBody::Pages { total_pages } => format!("{total_pages} pages"),
        BookCardBody::Finished {
            total_pages,
            started,
            finished,
        } => {
            let mut parts = Vec::new();
            if let Some(pages) = total_pages {
                parts.push(format!("{pages} pages"));
            }
            if let Some(date) = started {
                parts.push(format!("started {date}"));
            }
            if let Some(date) = finished {
                parts.push(format!("finished {date}"));
            }
            parts.join(", ")
        }
        BookCardBody::Empty => String::new(),
    }
}

fn card_line(card: &BookCardVm) -> String {
    let mut line = format!(
        "{}  {} by {}  [{}]",
        card.id, card.title, card.author, card.status_label
    );
    let summary = body_summary(&card.body);
    if !summary.is_empty() {
        line.push_str("  ");
        line.push_str(&summary);
    }
    if card.has_notes {
        line.push_str("  (notes)");
    }
    line
}

fn goal_lines(out: &mut dyn Write, goal: &GoalCardVm) -> CommandResult {
    writeln!(out, "{}", goal.period_label)?;
    writeln!(out, "  {} pages per day", goal.pages_per_day)?;
    writeln!(out, "  {} target pages", goal.target_pages)?;
    writeln!(out, "  {}", goal.days_label)?;
    Ok(())
}

/// Run one subcommand against `services`, writing user-facing output to `out`.
///
/// # Errors
///
/// Returns the failing service or I/O error; the caller turns it into a notice.
pub async fn execute(services: &AppServices, command: Command, out: &mut dyn Write) -> CommandResult {
    match command {
        Command::Signup(args) => {
            let outcome = services.auth().sign_up(&args.email, &args.password).await?;
            let text = match outcome {
                SignUpOutcome::ConfirmationSent(_) => {
                    "Account created. Check your email to confirm it, then log in.".to_string()
                }
                SignUpOutcome::SignedIn(session) => format!(
                    "Account created, signed in as {}",
                    session.user.email.as_deref().unwrap_or(&args.email)
                ),
            };
            notice(out, &Notice::success(text))
        }
        Command::Login(args) => {
            let user = services.auth().sign_in(&args.email, &args.password).await?;
            let email = user.email.as_deref().unwrap_or(&args.email);
            notice(out, &Notice::success(format!("Signed in as {email}")))
        }
        Command::Logout => {
            services.auth().sign_out().await?;
            notice(out, &Notice::success("Signed out"))
        }
        Command::Whoami => {
            match services.auth().current_user().await? {
                Some(user) => writeln!(
                    out,
                    "{} ({})",
                    user.email.as_deref().unwrap_or("no email"),
                    user.id
                )?,
                None => writeln!(out, "not signed in")?,
            }
            Ok(())
        }
        Command::Books => {
            let books = services.library().load_library().await?;
            if books.is_empty() {
                writeln!(out, "Your library is empty. Add your first book to get started.")?;
            }
            for card in map_book_cards(&books) {
                writeln!(out, "{}", card_line(&card))?;
            }
            Ok(())
        }
        Command::Add(args) => add_book(services, args, out).await,
        Command::Show { id } => {
            let library = services.library();
            let book = library.get_book(id).await?;
            let logs = library.reading_history(id).await?;
            let totals = pages_read_by_book(logs.iter().map(ReadingLog::tally));
            let item = BookWithProgress::new(book, pages_read_for(&totals, id));
            let detail = BookDetailVm::new(&item, &logs);

            writeln!(out, "{}", detail.card.title)?;
            writeln!(out, "by {}", detail.card.author)?;
            writeln!(out, "Status: {}", detail.card.status_label)?;
            if let Some(progress) = &detail.progress_line {
                writeln!(out, "Progress: {progress}")?;
            }
            if let Some(date) = item.book.start_date() {
                writeln!(out, "Started: {}", format_date(date))?;
            }
            if let Some(date) = item.book.end_date() {
                writeln!(out, "Finished: {}", format_date(date))?;
            }
            if let Some(notes) = &detail.notes {
                writeln!(out, "Notes:\n{notes}")?;
            }
            if !detail.history.is_empty() {
                writeln!(out, "History:")?;
                for entry in &detail.history {
                    writeln!(out, "  {}  {} pages", entry.date_str, entry.pages_read)?;
                }
            }
            Ok(())
        }
        Command::Edit(args) => edit_book(services, args, out).await,
        Command::Log(args) => log_pages(services, args, out).await,
        Command::Delete { id } => {
            let title = services.library().delete_book(id).await?;
            notice(out, &Notice::success(format!("Deleted \"{title}\"")))
        }
        Command::Goal(GoalCommand::Set { pages, period }) => {
            let goal = services
                .goals()
                .set_goal(ReadingGoalDraft {
                    target_pages: pages,
                    period: Some(period),
                })
                .await?;
            let card = GoalCardVm::from(&GoalPace::from_goal(&goal));
            notice(
                out,
                &Notice::success(format!(
                    "Reading goal saved: {} pages, {} pages per day",
                    card.target_pages, card.pages_per_day
                )),
            )
        }
        Command::Goal(GoalCommand::Show) => match services.goals().current_goal().await? {
            Some(pace) => goal_lines(out, &GoalCardVm::from(&pace)),
            None => {
                writeln!(out, "No reading goal set")?;
                Ok(())
            }
        },
        Command::Profile(ProfileCommand::Show) => {
            let overview = services.profiles().load_overview().await?;
            let stats = ProfileStatsVm::from(&overview);
            writeln!(out, "{} [{}]", stats.heading, stats.initials)?;
            writeln!(out, "Name: {}", stats.display_name)?;
            if let Some(email) = &stats.email {
                writeln!(out, "Email: {email}")?;
            }
            if let Some(country) = &stats.country {
                writeln!(out, "Country: {country}")?;
            }
            if let Some(gender) = overview.profile.as_ref().and_then(|p| p.gender()) {
                writeln!(out, "Gender: {gender}")?;
            }
            writeln!(
                out,
                "Read: {}  Reading: {}  To read: {}",
                stats.read, stats.reading, stats.to_read
            )?;
            Ok(())
        }
        Command::Profile(ProfileCommand::Set {
            first_name,
            last_name,
            country,
            gender,
        }) => {
            let profiles = services.profiles();
            let mut draft = profiles.load_overview().await?.draft();
            // Whole-row upsert: start from the stored values.
            if first_name.is_some() {
                draft.first_name = first_name;
            }
            if last_name.is_some() {
                draft.last_name = last_name;
            }
            if country.is_some() {
                draft.country = country;
            }
            if gender.is_some() {
                draft.gender = gender;
            }
            profiles.save_profile(draft).await?;
            notice(out, &Notice::success("Profile updated"))
        }
        Command::Subscribe { email } => {
            let email = services.newsletter().subscribe(&email).await?;
            notice(
                out,
                &Notice::success(format!("Subscribed {email} to the newsletter")),
            )
        }
        Command::ExportHtml { output } => {
            let books = services.library().load_library().await?;
            let goal = services.goals().current_goal().await?;
            let overview = services.profiles().load_overview().await?;
            let html = render_library_page(LibraryDocument {
                books: &books,
                goal: goal.as_ref(),
                stats: Some(ProfileStatsVm::from(&overview)),
                notice: None,
            });
            match output {
                Some(path) => {
                    std::fs::write(&path, html)?;
                    notice(
                        out,
                        &Notice::success(format!("Library exported to {}", path.display())),
                    )
                }
                None => {
                    out.write_all(html.as_bytes())?;
                    Ok(())
                }
            }
        }
    }
}

async fn add_book(services: &AppServices, args: AddArgs, out: &mut dyn Write) -> CommandResult {
    let draft = BookDraft {
        status: args.status,
        total_pages: args.pages,
        notes: args.notes,
        ..BookDraft::new(args.title, args.author)
    };
    let book = services.library().add_book(draft).await?;
    writeln!(out, "{}", book.id())?;
    notice(out, &Notice::success(format!("Added \"{}\"", book.title())))
}

async fn edit_book(services: &AppServices, args: EditArgs, out: &mut dyn Write) -> CommandResult {
    let library = services.library();
    let book = library.get_book(args.id).await?;

    let mut form = BookDetailsFormVm::from_book(&book);
    if let Some(status) = args.status {
        form = form.with_status(status);
    }
    if let Some(date) = args.start_date {
        if form.show_start_date {
            form.draft.start_date = Some(date);
        } else {
            writeln!(out, "note: start date ignored for books not started yet")?;
        }
    }
    if let Some(date) = args.end_date {
        if form.show_end_date {
            form.draft.end_date = Some(date);
        } else {
            writeln!(out, "note: end date ignored for books not marked as read")?;
        }
    }
    if let Some(notes) = args.notes {
        form.draft.notes = Some(notes);
    }

    let updated = library.update_details(args.id, form.into_draft()).await?;
    notice(out, &Notice::success(format!("Updated \"{}\"", updated.title())))
}

async fn log_pages(services: &AppServices, args: LogArgs, out: &mut dyn Write) -> CommandResult {
    let library = services.library();
    let book = library.get_book(args.id).await?;
    if !BookDetailsFormVm::from_book(&book).show_log_form {
        return Err(CommandError::NotReading(book.title().to_owned()).into());
    }

    let mut draft = library.log_draft();
    draft.pages_read = args.pages;
    if let Some(date) = args.date {
        draft.date_read = date;
    }
    let log = library.log_progress(args.id, draft).await?;
    notice(
        out,
        &Notice::success(format!(
            "Logged {} pages on {}",
            log.pages_read(),
            format_date(log.date_read())
        )),
    )
}
