use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tokio::io::{stdin, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use danci_games::catalog::Catalog;
use danci_games::config::{Config, TimingConfig};
use danci_games::error::{GameError, Phase, Result};
use danci_games::fill_gap::FillGapSession;
use danci_games::flashcards::{format_clock, FlashcardSession};
use danci_games::logging::init_tracing;
use danci_games::narration::{
    Narrator, SpeechConfig, SpeechEngine, SpeechEvent, TtsError, UtteranceId, UtteranceOutcome,
};
use danci_games::runtime::{sleep_for, Clocked};
use danci_games::shuffle::seeded_rng;
use danci_games::translations::{toggle_translations, RuText};
use danci_games::types::{GameKind, Lesson};
use danci_games::verbs::{
    bundled_collections, collections, filter, CardNavigator, CollectionPolicy, NO_MATCHES_MESSAGE,
    TABLE_ONE_ID,
};

#[derive(Debug, Parser)]
#[command(name = "danci-games", version, about = "EN/RU vocabulary mini-games in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List units, lessons and their games
    List,
    /// Choose the word that completes each sentence
    FillTheGap(LessonArgs),
    /// Flip lesson phrases before the time runs out
    Flashcards(LessonArgs),
    /// Irregular verb flip cards with read-aloud
    Verbs {
        #[arg(long, default_value = TABLE_ONE_ID)]
        collection: String,
        /// Keep the stored order until shuffled
        #[arg(long)]
        ordered: bool,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the irregular verb table
    Table {
        #[arg(long, default_value = TABLE_ONE_ID)]
        collection: String,
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Debug, Args)]
struct LessonArgs {
    #[arg(long)]
    unit: String,
    #[arg(long)]
    lesson: String,
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = init_tracing(&config.log_level);

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "game aborted");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::List => {
            print_catalog(&load_catalog(config)?);
            Ok(())
        }
        Command::FillTheGap(args) => {
            let catalog = load_catalog(config)?;
            catalog.game(&args.unit, GameKind::FillTheGap.as_str())?;
            let lesson = catalog.lesson(&args.unit, &args.lesson)?;
            play_fill_gap(lesson, args.seed, &config.timing).await
        }
        Command::Flashcards(args) => {
            let catalog = load_catalog(config)?;
            catalog.game(&args.unit, GameKind::Flashcards.as_str())?;
            let lesson = catalog.lesson(&args.unit, &args.lesson)?;
            play_flashcards(lesson, args.seed, &config.timing).await
        }
        Command::Verbs {
            collection,
            ordered,
            seed,
        } => {
            let policy = if ordered {
                CollectionPolicy::Ordered
            } else {
                CollectionPolicy::AutoShuffle
            };
            play_verbs(&collection, policy, seed, &config.timing).await
        }
        Command::Table { collection, search } => {
            print_table(&collection, search.as_deref().unwrap_or(""))
        }
    }
}

fn load_catalog(config: &Config) -> Result<Catalog> {
    match &config.units_path {
        Some(path) => {
            info!(path = %path.display(), "loading units from file");
            Catalog::from_path(path)
        }
        None => Catalog::bundled(),
    }
}

// ============================================================================
// Console input
// ============================================================================

enum Input {
    Line(String),
    Timer,
    Quit,
}

/// Stdin lines raced against the session's next timer
struct Console {
    lines: Lines<BufReader<Stdin>>,
    last: Instant,
}

impl Console {
    fn new() -> Self {
        Self {
            lines: BufReader::new(stdin()).lines(),
            last: Instant::now(),
        }
    }

    /// Waits for a line, the next timer or Ctrl+C, then advances `session`
    /// by the real time that passed.
    async fn next<C: Clocked + ?Sized>(&mut self, session: &mut C) -> Input {
        let wait = session.time_to_next();
        let input = tokio::select! {
            line = self.lines.next_line() => match line {
                Ok(Some(line)) => Input::Line(line.trim().to_string()),
                Ok(None) => Input::Quit,
                Err(err) => {
                    warn!(error = %err, "stdin read failed");
                    Input::Quit
                }
            },
            _ = sleep_for(wait) => Input::Timer,
            _ = tokio::signal::ctrl_c() => Input::Quit,
        };

        let now = Instant::now();
        session.advance(now - self.last);
        self.last = now;
        input
    }
}

// ============================================================================
// Games
// ============================================================================

async fn play_fill_gap(lesson: &Lesson, seed: Option<u64>, timing: &TimingConfig) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let mut session = FillGapSession::new(lesson, &mut rng, timing);
    match session.start() {
        Ok(()) => {}
        Err(GameError::InsufficientContent(_)) => {
            println!("Not enough words in this lesson for Fill the gap. / В этом уроке недостаточно слов для игры.");
            return Ok(());
        }
        Err(err) => return Err(err),
    }
    println!("Type the number of your answer, q to quit.");

    let mut console = Console::new();
    let mut shown = None;
    let mut bursts = session.celebration_trigger();
    loop {
        celebrate(session.celebration_trigger(), &mut bursts);
        if session.phase() == Phase::Finished {
            println!(
                "\nResult: {}/{} ({}%)",
                session.score(),
                session.total(),
                session.percent()
            );
            break;
        }
        if shown != Some(session.index()) {
            if let Some(question) = session.current() {
                println!(
                    "\n[{}/{}] score {}",
                    session.index() + 1,
                    session.total(),
                    session.score()
                );
                println!("  {}", question.render("____"));
                for (i, option) in question.options.iter().enumerate() {
                    println!("  {}) {}", i + 1, option);
                }
            }
            shown = Some(session.index());
        }

        match console.next(&mut session).await {
            Input::Quit => break,
            Input::Timer => {}
            Input::Line(line) if line == "q" => break,
            Input::Line(line) => {
                let option = line
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| session.current().and_then(|q| q.options.get(i)))
                    .cloned();
                let Some(option) = option else {
                    println!("  pick 1-{}", session.current().map(|q| q.options.len()).unwrap_or(0));
                    continue;
                };
                if let Some(outcome) = session.select_answer(&option) {
                    if outcome.correct {
                        println!("  ✓ correct");
                    } else {
                        println!("  ✗ the answer is \"{}\"", outcome.expected);
                    }
                }
            }
        }
    }

    session.close();
    Ok(())
}

async fn play_flashcards(lesson: &Lesson, seed: Option<u64>, timing: &TimingConfig) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let mut session = FlashcardSession::new(lesson, &mut rng, timing);
    session.start()?;
    println!("f = flip, k = I know it, s = skip, t = toggle translations, q = quit");

    let mut console = Console::new();
    let mut shown = None;
    let mut bursts = session.celebration_trigger();
    loop {
        celebrate(session.celebration_trigger(), &mut bursts);
        if let Some(summary) = session.summary() {
            if session.seconds_left() == 0 {
                println!("\nTime is up! / {}", RuText::render("Время вышло!"));
            } else {
                println!("\nDone! / {}", RuText::render("Готово!"));
            }
            println!(
                "Known {} · skipped {} · {} cards ({}%)",
                summary.known, summary.skipped, summary.total, summary.percent
            );
            break;
        }
        let view = (session.index(), session.show_back());
        if shown != Some(view) {
            if let Some(card) = session.current() {
                let (face, hint_ru) = if session.show_back() {
                    (card.ru.as_str(), "Нажмите f, чтобы показать английский")
                } else {
                    (card.en.as_str(), "Нажмите f, чтобы показать перевод")
                };
                println!(
                    "\n[{}/{}] {}  {}",
                    session.index() + 1,
                    session.deck().len(),
                    format_clock(session.seconds_left()),
                    face
                );
                println!("  {}", RuText::render(hint_ru));
            }
            shown = Some(view);
        }

        match console.next(&mut session).await {
            Input::Quit => break,
            Input::Timer => {}
            Input::Line(line) => match line.as_str() {
                "q" => break,
                "f" => {
                    session.flip();
                }
                "k" => {
                    session.mark_known();
                }
                "s" => {
                    session.skip();
                }
                "t" => {
                    toggle_translations();
                    shown = None;
                }
                _ => println!("  f / k / s / t / q"),
            },
        }
    }

    session.close();
    Ok(())
}

async fn play_verbs(
    collection: &str,
    policy: CollectionPolicy,
    seed: Option<u64>,
    timing: &TimingConfig,
) -> Result<()> {
    let narrator = Narrator::new(
        Some(Box::new(ConsoleSpeech::default())),
        SpeechConfig::default(),
        timing.narration_gap(),
    );
    let mut navigator = CardNavigator::with_seed(bundled_collections()?, policy, timing, narrator, seed);
    navigator.select_collection(collection)?;
    println!("f = flip, n/p = next/previous, t = translation, l = listen, s = shuffle, c <id> = collection, q = quit");

    let mut console = Console::new();
    let mut shown = None;
    loop {
        let view = (
            navigator.active_collection().map(|c| c.id.clone()),
            navigator.index(),
            navigator.show_back(),
            navigator.show_translation(),
            navigator.len(),
        );
        if shown.as_ref() != Some(&view) {
            print_card(&navigator);
            shown = Some(view);
        }

        match console.next(&mut navigator).await {
            Input::Quit => break,
            Input::Timer => {}
            Input::Line(line) => {
                let mut words = line.split_whitespace();
                match (words.next(), words.next()) {
                    (Some("q"), _) => break,
                    (Some("f"), _) => {
                        navigator.flip();
                    }
                    (Some("n"), _) => {
                        navigator.go_next();
                    }
                    (Some("p"), _) => {
                        navigator.go_prev();
                    }
                    (Some("t"), _) => {
                        navigator.toggle_translation();
                    }
                    (Some("l"), _) => {
                        navigator.speak_current();
                    }
                    (Some("s"), _) => {
                        navigator.shuffle();
                        shown = None;
                    }
                    (Some("c"), Some(id)) => {
                        if let Err(err) = navigator.select_collection(id) {
                            println!("  {err}");
                        }
                    }
                    _ => println!("  f / n / p / t / l / s / c <id> / q"),
                }
                navigator.pump_speech();
            }
        }
    }

    navigator.close();
    Ok(())
}

/// Prints a burst for every trigger the session fired since the last call
fn celebrate(trigger: u64, seen: &mut u64) {
    if trigger != *seen {
        println!("  🎉");
        *seen = trigger;
    }
}

fn print_card<R: rand::Rng>(navigator: &CardNavigator<R>) {
    let label = navigator
        .active_collection()
        .map(|c| c.label.as_str())
        .unwrap_or_default();
    if let Some(message) = navigator.empty_message() {
        println!("\n{label}: {message}");
        return;
    }
    let Some(verb) = navigator.current() else {
        return;
    };
    let face = if navigator.show_back() {
        format!("{} – {} – {}", verb.v1, verb.v2, verb.v3)
    } else {
        verb.v1.clone()
    };
    println!("\n{label} [{}/{}]  {face}", navigator.index() + 1, navigator.len());
    if navigator.show_translation() {
        println!("  {}", verb.ru);
    }
}

// ============================================================================
// Static output
// ============================================================================

fn print_catalog(catalog: &Catalog) {
    for unit in catalog.units() {
        println!("Unit {} · {} / {}", unit.unit, unit.title, unit.title_ru_or_default());
        for lesson in &unit.lessons {
            println!(
                "  {:<4} {} ({} words, {} adverbs)",
                lesson.id,
                lesson.title,
                lesson.vocabulary.len(),
                lesson.adverbs.len()
            );
        }
        let games: Vec<&str> = unit.games.iter().map(|g| g.id.as_str()).collect();
        println!("  games: {}", games.join(", "));
    }
}

fn print_table(collection: &str, query: &str) -> Result<()> {
    let all = bundled_collections()?;
    let collection = collections::find(&all, collection)?;
    if collection.is_empty() {
        println!("{}: {}", collection.label, danci_games::verbs::EMPTY_COLLECTION_MESSAGE);
        return Ok(());
    }

    let rows = filter(&collection.verbs, query);
    if rows.is_empty() {
        println!("{NO_MATCHES_MESSAGE}");
        return Ok(());
    }
    println!("{:<12} {:<12} {:<12} {}", "V1", "V2", "V3", "RU");
    for verb in rows {
        println!("{:<12} {:<12} {:<12} {}", verb.v1, verb.v2, verb.v3, verb.ru);
    }
    Ok(())
}

// ============================================================================
// Speech
// ============================================================================

/// Prints utterances instead of playing them; each one completes at once
#[derive(Debug, Default)]
struct ConsoleSpeech {
    next_id: u64,
    finished: Vec<SpeechEvent>,
}

impl SpeechEngine for ConsoleSpeech {
    fn speak(&mut self, text: &str, config: &SpeechConfig) -> std::result::Result<UtteranceId, TtsError> {
        self.next_id += 1;
        let id = UtteranceId(self.next_id);
        debug!(language = %config.language, rate = config.rate, text, "utterance");
        println!("  🔊 {text}");
        self.finished.push(SpeechEvent {
            id,
            outcome: UtteranceOutcome::Completed,
        });
        Ok(id)
    }

    fn cancel(&mut self) {
        self.finished.clear();
    }

    fn drain_events(&mut self) -> Vec<SpeechEvent> {
        std::mem::take(&mut self.finished)
    }
}
