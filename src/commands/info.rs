use stamp_archive::Method;
use stamp_config::Config;
use stamp_naming::{LOCATIONS, MediaType};

/// List the choices offered for media type, asset type and location.
pub fn options() {
    println!("Media types and their asset types (first is the default):");
    for media in MediaType::ALL {
        println!("  {media}: {}", media.asset_types().join(", "));
    }
    println!();
    println!("Locations:");
    for location in LOCATIONS {
        println!("  {location}");
    }
}

/// Report what this build and environment can do.
pub fn doctor(config: &Config) {
    let capabilities = super::converter(&config.convert).capabilities();
    println!("Conversion:");
    println!("  strategies:   {}", capabilities.strategies.join(" -> "));
    println!("  native audio: {}", yes_no(capabilities.native_audio));
    println!("  ffmpeg:       {}", yes_no(capabilities.ffmpeg));
    println!("  max size:     {} bytes", capabilities.max_size);
    println!("  auto-convert: {}", yes_no(config.convert.auto));
    println!("Archive:");
    let methods: Vec<_> = Method::available().iter().map(Method::as_str).collect();
    println!("  methods:      {}", methods.join(", "));
    println!("  default:      {}", config.archive.method);
    match config.archive.archive_name() {
        Ok(name) => println!("  name:         {name}"),
        Err(e) => println!("  name:         invalid ({})", *e),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
