//! Terminal rendering: banners, the menu and bordered panels.

use dailydose_core::{Category, CategoryReport, DailyDoseSummary, PipelineOutcome, Record, StoreStats};

use crate::pipeline::Presenter;

/// Body text wider than this is wrapped onto several lines.
const WRAP_WIDTH: usize = 68;

const WELCOME: &str = r#"
╔══════════════════════════════════════╗
║                                      ║
║         DAILY MOTIVATION HUB         ║
║  Your one-stop destination for daily ║
║             motivation!              ║
║  Books | Advice | Quotes | Cute Dogs ║
║                                      ║
╚══════════════════════════════════════╝"#;

const MENU: &str = r#"
╔════════════════ MAIN MENU ═══════════════╗
║                                          ║
║   1. Get Random Advice                   ║
║   2. Get Book Recommendation             ║
║   3. Get Inspirational Quote             ║
║   4. Get Cute Dog Image                  ║
║   5. Get Everything (Daily Dose!)        ║
║   6. Show Data Statistics                ║
║   7. Exit                                ║
║                                          ║
╚══════════════════════════════════════════╝"#;

const SEPARATOR_WIDTH: usize = 60;

pub fn print_welcome() {
    println!("{}\n", WELCOME);
}

pub fn print_menu() {
    println!("{}", MENU);
}

fn display_width(s: &str) -> usize {
    s.chars().count()
}

/// Greedy word wrap. Words longer than `width` (URLs) stay on their own line.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && display_width(&current) + 1 + display_width(word) > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Draws `body` inside a rounded border, title on top and subtitle below.
pub fn render_panel(title: &str, body: &str, subtitle: &str) -> String {
    let lines: Vec<String> = body.lines().flat_map(|l| wrap(l, WRAP_WIDTH)).collect();
    let content_width = lines.iter().map(|l| display_width(l)).max().unwrap_or(0);
    let title_width = display_width(title);
    let subtitle_width = display_width(subtitle);

    let inner = (content_width + 2)
        .max(title_width + 4)
        .max(subtitle_width + 4);

    let mut out = String::new();
    out.push_str(&format!(
        "╭─ {} {}╮\n",
        title,
        "─".repeat(inner - title_width - 3)
    ));
    for line in &lines {
        out.push_str(&format!(
            "│ {}{} │\n",
            line,
            " ".repeat(inner - 2 - display_width(line))
        ));
    }
    if subtitle.is_empty() {
        out.push_str(&format!("╰{}╯", "─".repeat(inner)));
    } else {
        out.push_str(&format!(
            "╰{} {} ─╯",
            "─".repeat(inner - subtitle_width - 3),
            subtitle
        ));
    }
    out
}

pub fn render_record(record: &Record) -> String {
    match record {
        Record::Advice(advice) => render_panel(
            "Advice for Today",
            &format!("\"{}\"", advice.text),
            &format!("Advice ID: {}", advice.id),
        ),
        Record::Book(book) => render_panel(
            "Book Recommendation",
            &format!(
                "Title: {}\nAuthor: {}\nPages: {}\nRelease Date: {}",
                book.title, book.author, book.pages, book.release_date
            ),
            "Enjoy Reading..",
        ),
        Record::Quote(quote) => render_panel(
            "Inspirational Quote",
            &format!("\"{}\"", quote.text),
            &format!("- {}", quote.author),
        ),
        Record::Dog(dog) => render_panel(
            "Cute Dog Image",
            &format!(
                "Breed: {}\nImage URL: {}\n\nCopy the URL into your browser to see the image!",
                dog.breed, dog.image_url
            ),
            "Here is a good boy/girl!",
        ),
    }
}

pub fn render_stats(stats: &StoreStats) -> String {
    render_panel(
        "Data Statistics",
        &format!(
            "Total Entries: {}\n\nAdvice Count: {}\nBooks Count: {}\nQuotes Count: {}\nDogs Count: {}",
            stats.total(),
            stats.count(Category::Advice),
            stats.count(Category::Book),
            stats.count(Category::Quote),
            stats.count(Category::Dog),
        ),
        "Count of saved items",
    )
}

/// One-line verdict naming the category and the action that failed or succeeded.
pub fn report_message(report: &CategoryReport) -> String {
    let noun = report.category.noun();
    match report.outcome {
        PipelineOutcome::Saved => {
            let mut noun = noun.to_string();
            if let Some(first) = noun.get_mut(0..1) {
                first.make_ascii_uppercase();
            }
            format!("✓ {} saved successfully!", noun)
        }
        PipelineOutcome::SaveFailed => format!("✗ Failed to save {}!", noun),
        PipelineOutcome::FetchFailed => {
            let article = match report.category {
                Category::Advice => "",
                _ => "a ",
            };
            format!(
                "❌ Failed to fetch {}{}. Please try again later.",
                article, noun
            )
        }
    }
}

/// Presenter that prints to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPresenter;

impl Presenter for TerminalPresenter {
    fn fetching(&self, category: Category) {
        println!("⏳ Fetching {}...", category.noun());
    }

    fn show_record(&self, record: &Record) {
        println!("{}", render_record(record));
    }

    fn report(&self, report: &CategoryReport) {
        println!("{}", report_message(report));
    }

    fn everything_started(&self) {
        println!("\n🌟 Preparing your daily dose of motivation...\n");
    }

    fn before_category(&self, _category: Category) {
        println!("{}", "=".repeat(SEPARATOR_WIDTH));
    }

    fn everything_finished(&self, summary: &DailyDoseSummary) {
        println!("\nYour daily motivation dose is complete! Have a great day. ✨");
        println!(
            "Saved {} of {} items.",
            summary.saved_count(),
            summary.total()
        );
    }

    fn show_stats(&self, stats: &StoreStats) {
        println!("{}", render_stats(stats));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dailydose_core::{timestamp_now, AdviceRecord, DogRecord};

    #[test]
    fn test_wrap_short_text() {
        assert_eq!(wrap("hello world", 20), vec!["hello world"]);
    }

    #[test]
    fn test_wrap_long_text() {
        let lines = wrap("one two three four five", 9);
        assert_eq!(lines, vec!["one two", "three", "four five"]);
    }

    #[test]
    fn test_wrap_keeps_long_word() {
        let url = "https://images.dog.ceo/breeds/hound-afghan/n02088094_1003.jpg";
        assert_eq!(wrap(url, 10), vec![url]);
    }

    #[test]
    fn test_wrap_empty_line() {
        assert_eq!(wrap("", 10), vec![""]);
    }

    #[test]
    fn test_panel_lines_have_equal_width() {
        let panel = render_panel("Title", "short\na somewhat longer line", "sub");
        let widths: Vec<usize> = panel.lines().map(display_width).collect();
        assert!(widths.iter().all(|w| *w == widths[0]), "{panel}");
        assert!(panel.starts_with("╭─ Title "));
        assert!(panel.ends_with(" sub ─╯"));
    }

    #[test]
    fn test_panel_wide_subtitle() {
        let panel = render_panel("T", "x", "a rather long subtitle here");
        let widths: Vec<usize> = panel.lines().map(display_width).collect();
        assert!(widths.iter().all(|w| *w == widths[0]), "{panel}");
    }

    #[test]
    fn test_render_advice() {
        let panel = render_record(&Record::Advice(AdviceRecord {
            id: 12,
            text: "Be kind.".to_string(),
            captured_at: timestamp_now(),
        }));
        assert!(panel.contains("Advice for Today"));
        assert!(panel.contains("\"Be kind.\""));
        assert!(panel.contains("Advice ID: 12"));
    }

    #[test]
    fn test_render_dog() {
        let panel = render_record(&Record::Dog(DogRecord {
            image_url: "https://images.dog.ceo/breeds/pug/1.jpg".to_string(),
            breed: "Pug".to_string(),
            captured_at: timestamp_now(),
        }));
        assert!(panel.contains("Breed: Pug"));
        assert!(panel.contains("Image URL: https://images.dog.ceo/breeds/pug/1.jpg"));
    }

    #[test]
    fn test_render_stats() {
        let mut stats = StoreStats::new();
        stats.record(Category::Book, 3);
        stats.record(Category::Dog, 2);
        let panel = render_stats(&stats);
        assert!(panel.contains("Total Entries: 5"));
        assert!(panel.contains("Books Count: 3"));
        assert!(panel.contains("Advice Count: 0"));
    }

    #[test]
    fn test_report_messages() {
        let saved = CategoryReport::new(Category::Advice, PipelineOutcome::Saved);
        assert_eq!(report_message(&saved), "✓ Advice saved successfully!");

        let not_saved = CategoryReport::new(Category::Dog, PipelineOutcome::SaveFailed);
        assert_eq!(report_message(&not_saved), "✗ Failed to save dog image!");

        let book = CategoryReport::new(Category::Book, PipelineOutcome::FetchFailed);
        assert_eq!(
            report_message(&book),
            "❌ Failed to fetch a book recommendation. Please try again later."
        );

        let advice = CategoryReport::new(Category::Advice, PipelineOutcome::FetchFailed);
        assert_eq!(
            report_message(&advice),
            "❌ Failed to fetch advice. Please try again later."
        );
    }
}
