use std::env;
use std::path::{Path, PathBuf};
use std::process;
use tagcanon::batch;
use tagcanon::config::Config;
use tagcanon::logging::init_logging;

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} <audio file or directory> [--config <config.toml>]", program);
    process::exit(1);
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("dump_tags");

    let mut target: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--config" => match rest.next() {
                Some(p) => config_path = Some(PathBuf::from(p)),
                None => usage(program),
            },
            _ if target.is_none() => target = Some(PathBuf::from(arg)),
            _ => usage(program),
        }
    }
    let Some(target) = target else { usage(program) };

    let config = match Config::parse(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    init_logging(&config.log_filter);

    if target.is_dir() {
        dump_directory(&target, &config);
    } else {
        dump_file(&target, &config);
    }
}

fn dump_file(path: &Path, config: &Config) {
    let metadata = match tagcanon::extract_path(path, &config.extract) {
        Ok(metadata) => metadata,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    match serde_json::to_string_pretty(&metadata) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize metadata: {}", e);
            process::exit(1);
        }
    }
    match (metadata.cover.as_ref(), metadata.cover_digest()) {
        (Some(cover), Some(digest)) => println!("Cover: {} bytes, sha256 {}", cover.len(), digest),
        _ => println!("Cover: none"),
    }
    println!("Title: {:?}", metadata.title());
    println!("Artists: {:?}", metadata.artists());
    println!("Album: {:?}", metadata.album());
    println!("Track: {:?}", metadata.track());
    println!("Genres: {:?}", metadata.genres());
}

fn dump_directory(root: &Path, config: &Config) {
    let paths = batch::scan(root, &config.batch);
    let items = match batch::extract_all(&paths, config) {
        Ok(items) => items,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    for item in items {
        match item.result {
            Ok(m) => println!(
                "{}\t{}\t{}ms\t{}",
                item.path.display(),
                m.mime_type,
                m.properties.duration_millis,
                m.title().unwrap_or("<untitled>")
            ),
            Err(e) => println!("{}\terror\t{}", item.path.display(), e),
        }
    }
}
