use tempophrase::{Instant, ParseDetails, ParsedResult};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";

    pub const PHRASE: &str = "\x1b[32m";
    pub const NUMBER: &str = "\x1b[33m";
    pub const REST: &str = "\x1b[34m";
    pub const TITLE: &str = "\x1b[36m";
    pub const RULE: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        fn wrap(&self, code: &str, s: &str) -> String {
            if self.enabled { format!("{code}{s}{RESET}") } else { s.to_string() }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            self.wrap(color, s.as_ref())
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            self.wrap(BOLD, s.as_ref())
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            self.wrap(DIM, s.as_ref())
        }
    }
}

const FORMAT: &str = "%A, %B %-d, %Y %-I:%M:%S %p %:z";

pub fn print_run(result: &ParsedResult, details: &ParseDetails, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Parsing: \"{}\"", result.input()), ansi::TITLE)));

    println!("\n{}", palette.paint("━━━ Phrase ━━━", ansi::RULE));
    if result.has_match() {
        print_phrase(result, &palette);
    } else {
        println!("{}", palette.dim("  No time phrase found"));
        println!("\n{}", palette.dim("  Tip: run with -vv to see which spans the engine tried"));
    }

    println!("\n{}", palette.paint("━━━ Resolved ━━━", ansi::RULE));
    print_instant("reference", result.reference(), &palette);
    print_instant("start", result.start(), &palette);
    print_instant("end", result.end(), &palette);
    if let Some(interval) = result.interval() {
        let length = interval.duration();
        let note = if length < chrono::Duration::zero() { " (reversed)" } else { "" };
        println!(
            "  {} {}",
            palette.dim(format!("{:<10}", "length:")),
            palette.paint(format!("{} min{}", length.num_minutes(), note), ansi::NUMBER)
        );
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::RULE));
    println!(
        "  Total: {}  │  Engine: {}  │  Normalize: {}",
        palette.paint(format!("{:?}", details.total), ansi::PHRASE),
        palette.paint(format!("{:?}", details.recognize), ansi::TITLE),
        palette.dim(format!("{:?}", details.normalize)),
    );
    println!(
        "  {} {}  {} {}",
        palette.dim("engine:"),
        palette.paint(&details.engine, ansi::REST),
        palette.dim("│ matches:"),
        palette.paint(details.reported.to_string(), ansi::NUMBER),
    );
    println!();
}

fn print_phrase(result: &ParsedResult, palette: &ansi::Palette) {
    let phrase = result.time_phrase().unwrap_or("");
    let offset = result.phrase_start().map_or_else(|| "?".to_string(), |o| o.to_string());

    println!(
        "  {} {} {}",
        palette.bold(palette.paint(format!("\"{phrase}\""), ansi::PHRASE)),
        palette.dim("│"),
        palette.paint(format!("at char {offset}"), ansi::NUMBER),
    );
    match result.ignored_text() {
        Some(rest) if !rest.is_empty() => println!("  {} {}", palette.dim("rest:"), palette.paint(rest, ansi::REST)),
        Some(_) => println!("  {}", palette.dim("rest: (nothing)")),
        None => {}
    }
}

fn print_instant(label: &str, instant: Option<Instant>, palette: &ansi::Palette) {
    let label = palette.dim(format!("{:<10}", format!("{label}:")));
    match instant {
        Some(instant) => println!("  {} {}", label, palette.bold(instant.format(FORMAT).to_string())),
        None => println!("  {} {}", label, palette.dim("-")),
    }
}
