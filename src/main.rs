use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use log::{debug, error, info, warn};
use parking_lot::RwLock;
use speller::lexer::Lexer;
use speller::pipeline::Pipeline;
use speller::{Config, Dictionary};
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};

#[derive(Parser)]
#[command(version, about = "Spell checker backed by a word list")]
struct Cli {
    /// Config file, defaults to <config dir>/speller/config.json
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the misspelled words of a text file and timing statistics
    Check {
        /// Word list to load instead of the configured one
        #[arg(short, long)]
        dictionary: Option<PathBuf>,
        text: PathBuf,
    },
    /// Run the language server on stdio (default)
    Serve,
}

struct Backend {
    client: Client,
    dictionary: Dictionary,
    config: RwLock<Config>,
}

impl Backend {
    fn diagnostics(&self, text: &str) -> Vec<Diagnostic> {
        let severity = self.config.read().diagnostic_severity.to_lsp_diagnostic();
        let words = self.dictionary.read();
        if !words.is_loaded() {
            return vec![];
        }

        let lexer = Lexer::new(text).with_max_length(words.max_word_length());
        Pipeline::new(&words)
            .run(lexer)
            .misspelled
            .into_iter()
            .map(|t| {
                Diagnostic::new(
                    Range {
                        start: Position::new(t.start.line(), t.start.column()),
                        end: Position::new(t.end.line(), t.end.column()),
                    },
                    Some(severity),
                    Some(NumberOrString::String(t.lexeme.clone())),
                    Some("speller".to_string()),
                    format!("Unknown word {}", t.lexeme),
                    None,
                    None,
                )
            })
            .collect()
    }

    async fn load_dictionary(&self) {
        let config = self.config.read().clone();
        self.dictionary.reset(config.word_set());

        let dictionary = self.dictionary.clone();
        let path = config.dictionary.clone();
        let loaded = tokio::task::spawn_blocking(move || dictionary.load(path)).await;

        match loaded {
            Ok(Ok(())) => {
                info!(
                    "loaded {} words from {:?}",
                    self.dictionary.size(),
                    config.dictionary
                );
            }
            Ok(Err(err)) => {
                error!("{err}");
                self.client
                    .log_message(MessageType::ERROR, format!("speller: {err}"))
                    .await;
            }
            Err(err) => error!("dictionary load task failed: {err}"),
        }
    }

    async fn publish(&self, uri: Url, text: &str, version: Option<i32>) {
        let diagnostics = self.diagnostics(text);
        debug!("{} misspelled words in {}", diagnostics.len(), uri);
        self.client
            .publish_diagnostics(uri, diagnostics, version)
            .await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        if let Some(options) = params.initialization_options {
            match Config::from_json(options) {
                Ok(config) => *self.config.write() = config,
                Err(err) => warn!("ignoring initialization options: {err}"),
            }
        }
        // Documents are only opened after this reply, so they never see a
        // half-loaded dictionary.
        self.load_dictionary().await;
        Ok(InitializeResult {
            server_info: None,
            offset_encoding: None,
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::FULL),
                        save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                            include_text: Some(true),
                        })),
                        ..Default::default()
                    },
                )),
                ..ServerCapabilities::default()
            },
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        debug!("initialized!");
    }

    async fn shutdown(&self) -> Result<()> {
        debug!("shutdown!");
        if let Err(err) = self.dictionary.unload() {
            warn!("{err}");
        }
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        debug!("file opened {}", params.text_document.language_id);
        let doc = params.text_document;
        self.publish(doc.uri, &doc.text, Some(doc.version)).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        // Full sync, so the last change holds the whole document.
        let Some(change) = params.content_changes.last() else {
            return;
        };
        let doc = params.text_document;
        self.publish(doc.uri, &change.text, Some(doc.version)).await;
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        debug!("file saved");
        if let Some(text) = params.text {
            self.publish(params.text_document.uri, &text, None).await;
        }
    }
}

fn seconds(duration: Duration) -> String {
    format!("{:.2}", duration.as_secs_f64())
}

fn check_file(config: &Config, text: &Path) -> ExitCode {
    let mut words = config.word_set();

    let started = Instant::now();
    if let Err(err) = words.load(&config.dictionary) {
        error!("{err}");
        eprintln!("Could not load {}.", config.dictionary.display());
        return ExitCode::FAILURE;
    }
    let time_load = started.elapsed();

    let text = match std::fs::read(text) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(err) => {
            error!("{err}");
            eprintln!("Could not open {}.", text.display());
            return ExitCode::FAILURE;
        }
    };

    println!("\nMISSPELLED WORDS\n");

    let started = Instant::now();
    let lexer = Lexer::new(&text).with_max_length(words.max_word_length());
    let report = Pipeline::new(&words).run(lexer);
    let time_check = started.elapsed();

    for token in &report.misspelled {
        println!("{}", token.lexeme);
    }

    let started = Instant::now();
    let words_in_dictionary = words.size();
    let time_size = started.elapsed();

    let started = Instant::now();
    let unloaded = words.unload();
    let time_unload = started.elapsed();
    if let Err(err) = unloaded {
        eprintln!("Could not unload {}: {err}", config.dictionary.display());
        return ExitCode::FAILURE;
    }

    println!("\nWORDS MISSPELLED:     {}", report.misspelled.len());
    println!("WORDS IN DICTIONARY:  {}", words_in_dictionary);
    println!("WORDS IN TEXT:        {}", report.words_checked);
    println!("TIME IN load:         {}", seconds(time_load));
    println!("TIME IN check:        {}", seconds(time_check));
    println!("TIME IN size:         {}", seconds(time_size));
    println!("TIME IN unload:       {}", seconds(time_unload));
    println!(
        "TIME IN TOTAL:        {}\n",
        seconds(time_load + time_check + time_size + time_unload)
    );

    ExitCode::SUCCESS
}

async fn serve(config: Config) {
    let (stdin, stdout) = (tokio::io::stdin(), tokio::io::stdout());

    let (service, socket) = LspService::new(|client| Backend {
        client,
        dictionary: Dictionary::new(config.word_set()),
        config: RwLock::new(config),
    });

    info!("Started language server");
    Server::new(stdin, stdout, socket).serve(service).await;
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match Config::from_path(path).await {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        },
        None => Config::load_default().await,
    };

    match cli.command.unwrap_or(Command::Serve) {
        Command::Check { dictionary, text } => {
            if let Some(dictionary) = dictionary {
                config.dictionary = dictionary;
            }
            check_file(&config, &text)
        }
        Command::Serve => {
            serve(config).await;
            ExitCode::SUCCESS
        }
    }
}
