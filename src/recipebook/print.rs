use colored::Colorize;
use recipebook::view::{CardView, DetailView, ViewState};

const PHOTO_MARKER: &str = "◉";

pub(super) fn print_success(message: &str) {
    println!("{}", message.green());
}

pub(super) fn print_warning(message: &str) {
    println!("{}", message.yellow());
}

pub(super) fn print_cards(view: &ViewState) {
    if let Some(hint) = view.empty_hint() {
        println!("{}", hint.dimmed());
        return;
    }
    for (i, card) in view.cards().iter().enumerate() {
        println!("{}", card_line(i + 1, card));
    }
}

fn card_line(position: usize, card: &CardView) -> String {
    let marker = if card.image.is_placeholder() {
        " "
    } else {
        PHOTO_MARKER
    };
    let mut line = format!(
        "{} {} {}",
        format!("{:>3}.", position).yellow(),
        marker,
        card.title.bold()
    );
    if !card.ingredients.is_empty() {
        line.push_str(&format!("  {}", card.ingredients.join(", ").dimmed()));
    }
    line
}

pub(super) fn print_detail(detail: &DetailView) {
    println!("{}", detail.name.bold());
    println!("{}", format!("id: {}", detail.id).dimmed());
    if let Some(description) = &detail.description {
        println!("{}", description);
    }
    if !detail.image.is_placeholder() {
        println!("{} {}", PHOTO_MARKER, "has photo".dimmed());
    }

    println!("--------------------------------");
    println!("{}", "Ingredients".underline());
    for ingredient in &detail.ingredients {
        println!("  - {}", ingredient);
    }

    println!();
    println!("{}", "Instructions".underline());
    for (i, step) in detail.instructions.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }
}
