use crate::api::{ApiError, WordBackend};
use crate::error::AppError;
use crate::prompt;
use crate::words::{FetchState, NewWord, Word, WordId, WordSource};
use tracing::error;

/// Validation and backend failures come back as `Usage` with the message to
/// show; a rejected token comes back as `SessionExpired`.
pub fn add_word(
    source: &mut WordSource,
    backend: &dyn WordBackend,
    english: &str,
    meaning: &str,
) -> Result<Word, AppError>
{
    let new_word = NewWord::new(english, meaning).map_err(AppError::Usage)?;
    match backend.create_word(&new_word) {
        Ok(word) => {
            source.push(word.clone());
            Ok(word)
        }
        Err(ApiError::Unauthorized) => Err(AppError::SessionExpired),
        Err(err) => {
            error!(error = %err, "failed to add word");
            Err(AppError::Usage("Failed to add word.".to_string()))
        }
    }
}

/// Deletes on the backend first; the local list only changes on success.
pub fn delete_word(
    source: &mut WordSource,
    backend: &dyn WordBackend,
    id: WordId,
) -> Result<(), AppError>
{
    match backend.delete_word(id) {
        Ok(()) => {
            source.remove(id);
            Ok(())
        }
        Err(ApiError::Unauthorized) => Err(AppError::SessionExpired),
        Err(err) => {
            error!(id, error = %err, "failed to delete word");
            Err(AppError::Usage("Failed to delete word.".to_string()))
        }
    }
}

pub fn render_list(source: &WordSource) -> Vec<String>
{
    match source.state() {
        FetchState::Failed => return vec!["Couldn't load your words.".to_string()],
        FetchState::Unauthorized => return vec!["Your session has expired.".to_string()],
        FetchState::Pending | FetchState::Loaded => {}
    }
    if source.is_empty() {
        return vec!["No words yet. Add one with 'a'.".to_string()];
    }
    let width = source
        .words()
        .iter()
        .map(|word| word.english.chars().count())
        .max()
        .unwrap_or(0);
    source
        .words()
        .iter()
        .enumerate()
        .map(|(index, word)| {
            format!(
                "{:>3}. {:<width$}  {}",
                index + 1,
                word.english,
                word.meaning,
                width = width
            )
        })
        .collect()
}

enum Command
{
    Add,
    Delete(usize),
    Reload,
    Back,
}

fn parse_command(input: &str) -> Result<Command, String>
{
    let mut parts = input.split_whitespace();
    match parts.next() {
        Some("a") | Some("add") => Ok(Command::Add),
        Some("d") | Some("delete") => {
            let position = parts
                .next()
                .ok_or_else(|| "Usage: d <number>".to_string())?
                .parse::<usize>()
                .map_err(|_| "Word number must be a positive integer".to_string())?;
            if position == 0 {
                return Err("Word number must be a positive integer".to_string());
            }
            Ok(Command::Delete(position))
        }
        Some("r") | Some("reload") => Ok(Command::Reload),
        None | Some("q") | Some("quit") => Ok(Command::Back),
        Some(other) => Err(format!("Unknown command '{other}'")),
    }
}

/// Line-oriented word list screen: list, add, delete, reload. Returns
/// `SessionExpired` as soon as the backend rejects the token.
pub fn run(backend: &dyn WordBackend) -> Result<(), AppError>
{
    let mut source = WordSource::new();
    println!("Loading...");
    if source.load(backend) == FetchState::Unauthorized {
        return Err(AppError::SessionExpired);
    }

    loop {
        println!();
        println!("My words");
        for line in render_list(&source) {
            println!("{line}");
        }
        println!();
        let input = prompt::read_line("[a]dd, [d]elete <n>, [r]eload, [q]uit: ")?;

        let result = match parse_command(&input) {
            Ok(Command::Back) => return Ok(()),
            Ok(Command::Reload) => match source.load(backend) {
                FetchState::Unauthorized => Err(AppError::SessionExpired),
                _ => Ok(()),
            },
            Ok(Command::Add) => {
                let english = prompt::read_line("English word: ")?;
                let meaning = prompt::read_line("Meaning: ")?;
                add_word(&mut source, backend, &english, &meaning)
                    .map(|word| println!("Added '{}'.", word.english))
            }
            Ok(Command::Delete(position)) => {
                match source.words().get(position - 1).map(|word| word.id) {
                    Some(id) => delete_word(&mut source, backend, id).map(|()| println!("Deleted.")),
                    None => Err(AppError::Usage(format!("No word number {position}."))),
                }
            }
            Err(message) => Err(AppError::Usage(message)),
        };
        match result {
            Ok(()) => {}
            Err(AppError::Usage(message)) => println!("{message}"),
            Err(err) => return Err(err),
        }
    }
}
