use crate::view::{
    ActivityCard, ListRegion, Screen, LOADING_NOTICE, LOAD_FAILED_NOTICE, NO_PARTICIPANTS,
};
use askama::Template;
use std::fmt::Write;

#[derive(Template)]
#[template(path = "activities.html")]
struct ActivitiesTemplate<'a> {
    show_cards: bool,
    cards: &'a [ActivityCard],
    notice: &'a str,
    no_participants: &'a str,
}

struct OptionRow<'a> {
    value: &'a str,
    label: &'a str,
    selected: bool,
}

#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    activities: String,
    options: Vec<OptionRow<'a>>,
    email: &'a str,
    message_class: &'a str,
    message: &'a str,
}

pub fn render_page(screen: &Screen) -> Result<String, askama::Error> {
    let (message_class, message) = match &screen.status {
        Some(status) => (status.severity.css_class(), status.text.as_str()),
        None => ("hidden", ""),
    };
    let options = screen
        .view
        .options
        .iter()
        .map(|option| OptionRow {
            value: &option.value,
            label: &option.label,
            selected: option.value == screen.form.activity,
        })
        .collect();

    PageTemplate {
        activities: render_list(screen)?,
        options,
        email: &screen.form.email,
        message_class,
        message,
    }
    .render()
}

/// Contents of the `#activities-list` region.
pub fn render_list(screen: &Screen) -> Result<String, askama::Error> {
    let notice = match screen.region {
        ListRegion::Loading => LOADING_NOTICE,
        ListRegion::Failed => LOAD_FAILED_NOTICE,
        ListRegion::Ready => "",
    };
    ActivitiesTemplate {
        show_cards: screen.region == ListRegion::Ready,
        cards: &screen.view.cards,
        notice,
        no_participants: NO_PARTICIPANTS,
    }
    .render()
}

/// Plain-text rendition for terminals.
pub fn render_text(screen: &Screen) -> String {
    let mut out = String::new();
    match screen.region {
        ListRegion::Loading => out.push_str(LOADING_NOTICE),
        ListRegion::Failed => out.push_str(LOAD_FAILED_NOTICE),
        ListRegion::Ready => {
            for card in &screen.view.cards {
                let _ = writeln!(out, "{}", card.name);
                let _ = writeln!(out, "  {}", card.description);
                let _ = writeln!(out, "  Schedule: {}", card.schedule);
                let _ = writeln!(out, "  Availability: {} spots left", card.spots_left);
                let _ = writeln!(
                    out,
                    "  Participants ({}/{})",
                    card.participant_count(),
                    card.max_participants
                );
                if card.rows.is_empty() {
                    let _ = writeln!(out, "    {NO_PARTICIPANTS}");
                }
                for row in &card.rows {
                    let _ = writeln!(out, "    - {}", row.email);
                }
            }
        }
    }
    if let Some(message) = &screen.status {
        let _ = write!(out, "\n[{}] {}", message.severity.css_class(), message.text);
    }
    out.trim_end().to_string()
}
