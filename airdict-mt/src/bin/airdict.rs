use airdict::load_dictionary_from_file;
use airdict_mt::{
    FieldTranslator, GoogleTranslateProvider, Lookup, LookupError, MachineTranslator, MockMode,
    MockTranslator, OpenAiExplainer, SearchResponse, WordExplainer,
};
use clap::{Arg, Command};
use std::env;
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("airdict")
        .version("0.1.0")
        .about("Bilingual dictionary lookup from the command line")
        .arg(
            Arg::new("query")
                .help("English word, Chinese phrase, or prefix with --suggest")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("dict")
                .long("dict")
                .short('d')
                .help("Path to the JSON dictionary file")
                .default_value("data/dict/stardict.json"),
        )
        .arg(
            Arg::new("full")
                .long("full")
                .short('f')
                .help("Show the full definition with translated senses")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("suggest")
                .long("suggest")
                .short('s')
                .help("List dictionary words starting with the query")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("explain")
                .long("explain")
                .short('e')
                .help("Ask the language model for a detailed explanation (needs OPENAI_API_KEY)")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("limit")
                .long("limit")
                .short('l')
                .help("Maximum number of suggestions")
                .value_parser(clap::value_parser!(usize))
                .default_value("10"),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use mock translator instead of Google Translate")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log the lookup and translation steps")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let query = matches.get_one::<String>("query").map(String::as_str).unwrap_or_default();
    let dict_path = matches
        .get_one::<String>("dict")
        .map(String::as_str)
        .unwrap_or("data/dict/stardict.json");
    let limit = matches.get_one::<usize>("limit").copied().unwrap_or(10);
    let suggest = matches.get_flag("suggest");
    let explain = matches.get_flag("explain");
    // Suggestions and explanations never call the translation provider
    let use_mock = matches.get_flag("mock") || suggest || explain;
    let verbose = matches.get_flag("verbose");

    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let dictionary = load_dictionary_from_file(Path::new(dict_path))?;

    let provider: Arc<dyn MachineTranslator> = if use_mock {
        Arc::new(MockTranslator::new(MockMode::Suffix))
    } else {
        if env::var("GOOGLE_TRANSLATE_API_KEY").is_err() {
            eprintln!("❌ GOOGLE_TRANSLATE_API_KEY environment variable not set");
            eprintln!("   Set it with: export GOOGLE_TRANSLATE_API_KEY=your_api_key");
            eprintln!("   Or use --mock to use mock translator");
            return Err("Missing API key".into());
        }
        Arc::new(GoogleTranslateProvider::from_env()?)
    };

    let lookup = Lookup::new(Arc::new(dictionary), FieldTranslator::new(provider));

    if suggest {
        for word in lookup.suggest(query, limit) {
            println!("{}", word);
        }
        return Ok(());
    }

    if explain {
        let explainer = OpenAiExplainer::from_env()?;
        let gloss = lookup.primary_gloss(query);
        let explanation = explainer.explain(query.trim(), gloss.as_deref()).await?;
        println!("{}", serde_json::to_string_pretty(&explanation)?);
        return Ok(());
    }

    let output = if matches.get_flag("full") {
        lookup
            .define(query)
            .await
            .map(|entry| serde_json::to_string_pretty(&entry))
    } else {
        lookup.search(query).await.map(|outcome| {
            serde_json::to_string_pretty(&SearchResponse::new(query.trim(), outcome))
        })
    };

    match output {
        Ok(json) => {
            println!("{}", json?);
            Ok(())
        }
        Err(LookupError::NotFound(word)) => {
            eprintln!("❌ '{}' is not in the dictionary", word);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
