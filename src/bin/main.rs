use clap::{clap_app, ArgMatches};
use log::{error, info, LevelFilter};
use std::{error, process::exit};
use tokio::{fs::OpenOptions, io::AsyncWriteExt};

use filmcat::{
    catalog::{self, Catalog},
    classify::{self, UrlHint},
    config::Config,
    embed,
    error::Error,
    notes,
    player::{self, Player},
    query,
    store::{FileStore, Store},
    upload::{self, UploadForm, Uploader},
};

mod catlog {
    use chrono::Utc;
    use log::{max_level, Log, Metadata, Record};

    pub struct CatalogLogger;

    impl Log for CatalogLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= max_level()
        }

        fn log(&self, record: &Record) {
            if self.enabled(record.metadata()) {
                eprintln!("{} - {} - {}", Utc::now(), record.level(), record.args());
            }
        }

        fn flush(&self) {}
    }
}

static LOGGER: catlog::CatalogLogger = catlog::CatalogLogger;

/// Form fields given on the command line, laid over `base`.
fn form_from(matches: &ArgMatches, base: UploadForm) -> UploadForm {
    let pick = |name: &str, fallback: String| {
        matches
            .value_of(name)
            .map(|v| v.trim().to_string())
            .unwrap_or(fallback)
    };
    UploadForm {
        drive_url: pick("url", base.drive_url),
        title: pick("title", base.title),
        description: pick("description", base.description),
        thumbnail_url: pick("thumbnail", base.thumbnail_url),
    }
}

fn report_validation(e: &Error) {
    if let Error::Validation(errors) = e {
        for field_error in errors.errors() {
            eprintln!("  {}: {}", field_error.field, field_error.message);
        }
    }
    eprintln!("{}", e);
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<(dyn error::Error + 'static)>> {
    let matches = clap_app!(filmcat =>
        (version: "0.0.1")
        (author: "krashanoff <leo@krashanoff.com>")
        (about: "A small video catalog.")
        (@setting SubcommandRequiredElseHelp)
        (@arg verbose: -v ... "Increases program verbosity")
        (@arg config: -c --config +takes_value "Reads settings from a TOML file")
        (@arg store: --store +takes_value "File holding user videos, drafts, and notes")
        (@arg catalog: --catalog +takes_value "Path or http(s) URL of the built-in catalog")
        (@subcommand classify =>
            (about: "Shows how a link is recognized and embedded")
            (@arg URL: +required "Link to classify")
        )
        (@subcommand add =>
            (about: "Adds a video to the catalog")
            (@arg url: -u --url +takes_value "Google Drive, YouTube, or direct video link")
            (@arg title: -t --title +takes_value "Title, 3 to 100 characters")
            (@arg description: -d --description +takes_value "Description, up to 500 characters")
            (@arg thumbnail: --thumbnail +takes_value "Thumbnail image link")
            (@arg from_draft: --draft "Starts from the saved draft")
        )
        (@subcommand draft =>
            (about: "Manages the saved upload draft")
            (@setting SubcommandRequiredElseHelp)
            (@subcommand save =>
                (about: "Saves the given fields as the draft")
                (@arg url: -u --url +takes_value "Video link")
                (@arg title: -t --title +takes_value "Title")
                (@arg description: -d --description +takes_value "Description")
                (@arg thumbnail: --thumbnail +takes_value "Thumbnail image link")
            )
            (@subcommand show => (about: "Prints the draft"))
            (@subcommand clear => (about: "Discards the draft"))
        )
        (@subcommand play =>
            (about: "Renders the player page for a video")
            (@arg VIDEO: +required "Video ID, or a query string such as ?id=...")
            (@arg out: -o --out +takes_value "Writes the page to a file instead of stdout")
        )
        (@subcommand notes =>
            (about: "Shows or saves notes for a video")
            (@arg ID: +required "Video ID")
            (@arg TEXT: "New notes; blank text removes them")
            (@arg clear: --clear "Removes the notes")
        )
        (@subcommand list => (about: "Lists every video in the catalog"))
        (@subcommand reset => (about: "Clears all user videos, drafts, and notes"))
    )
    .get_matches();

    if let Err(e) = log::set_logger(&LOGGER).map(|()| {
        log::set_max_level(match matches.occurrences_of("verbose") {
            0 => LevelFilter::Error,
            1 => LevelFilter::Warn,
            2 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        })
    }) {
        panic!("Failed to initialize logger! {}", e)
    }

    let mut config = match matches.value_of("config") {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(store) = matches.value_of("store") {
        config.store = store.into();
    }
    config.override_with(
        matches.value_of("catalog").map(String::from),
        None,
        None,
    );
    info!("Using store {}", config.store.display());

    let mut store = FileStore::open(&config.store)?;

    match matches.subcommand() {
        ("classify", Some(m)) => {
            let url = m.value_of("URL").unwrap_or_default();
            let kind = classify::classify(url);
            println!("kind:      {}", kind);
            println!("hint:      {}", UrlHint::for_url(url));
            println!("embed:     {}", embed::to_embed_url(url));
            if let Some(id) = classify::extract_drive_file_id(url) {
                println!("drive id:  {}", id);
            }
            if let Some(id) = classify::extract_youtube_id(url) {
                println!("video id:  {}", id);
            }
            if let Some(thumbnail) = embed::to_thumbnail_url(url) {
                println!("thumbnail: {}", thumbnail);
            }
        }
        ("add", Some(m)) => {
            let base = if m.is_present("from_draft") {
                upload::load_draft(&store)?.unwrap_or_default()
            } else {
                UploadForm::default()
            };
            let form = form_from(m, base);
            let result = Uploader::new(&mut store)
                .with_placeholder(config.placeholder_thumbnail.clone())
                .submit(form);
            match result {
                Ok(record) => {
                    println!("Video added successfully!");
                    println!("{}", serde_json::to_string_pretty(&record)?);
                }
                Err(e) => {
                    report_validation(&e);
                    exit(1)
                }
            }
        }
        ("draft", Some(m)) => match m.subcommand() {
            ("save", Some(fields)) => {
                let base = upload::load_draft(&store)?.unwrap_or_default();
                let form = form_from(fields, base);
                upload::save_draft(&mut store, &form)?;
                println!("{}", form.url_hint());
            }
            ("show", _) => match upload::load_draft(&store)? {
                Some(form) => println!("{}", serde_json::to_string_pretty(&form)?),
                None => println!("No draft saved."),
            },
            ("clear", _) => upload::clear_draft(&mut store)?,
            _ => unreachable!(),
        },
        ("play", Some(m)) => {
            let source = catalog::source_for(&config.catalog);
            let viewer =
                Player::new(&*source, &store).with_site_name(config.site_name.clone());

            let html = match query::resolve_video_id(m.value_of("VIDEO").unwrap_or_default()) {
                Ok(id) => viewer.render(&id).await,
                Err(e) => Err(player::render_error(&e.to_string(), viewer.site_name())),
            };
            let failed = html.is_err();
            let html = html.unwrap_or_else(|page| page);

            match m.value_of("out") {
                Some(path) => {
                    let mut dest = OpenOptions::new()
                        .read(false)
                        .write(true)
                        .create(true)
                        .truncate(true)
                        .open(path)
                        .await?;
                    dest.write_all(html.as_bytes()).await?;
                    info!("Wrote player page to {}", path);
                }
                None => print!("{}", html),
            }
            if failed {
                exit(1)
            }
        }
        ("notes", Some(m)) => {
            let id = m.value_of("ID").unwrap_or_default();
            if m.is_present("clear") {
                notes::save(&mut store, id, "")?;
            } else if let Some(text) = m.value_of("TEXT") {
                notes::save(&mut store, id, text)?;
                println!("Notes saved successfully!");
            } else {
                match notes::load(&store, id)? {
                    Some(text) => println!("{}", text),
                    None => println!("No notes for {}.", id),
                }
            }
        }
        ("list", _) => {
            let source = catalog::source_for(&config.catalog);
            let catalog = Catalog::load(&*source, &store).await?;
            for video in catalog.iter() {
                println!(
                    "{}\t{:?}\t{}\t{}",
                    video.id,
                    video.origin,
                    classify::classify(video.playable_url()),
                    video.title
                );
            }
            for id in catalog.duplicate_ids() {
                error!("Video id {} appears more than once", id);
            }
        }
        ("reset", _) => {
            store.clear()?;
            println!("Cleared {}.", config.store.display());
        }
        _ => unreachable!(),
    }

    Ok(())
}
