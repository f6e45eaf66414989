use crate::models::Catalog;
use crate::status::StatusMessage;

pub const SELECT_PLACEHOLDER: &str = "-- Select an activity --";
pub const NO_PARTICIPANTS: &str = "No participants yet";
pub const LOADING_NOTICE: &str = "Loading activities...";
pub const LOAD_FAILED_NOTICE: &str = "Failed to load activities. Please try again later.";

/// Identity of a participant row, as carried by its `data-activity` and
/// `data-email` attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowTarget {
    pub activity: String,
    pub email: String,
}

impl RowTarget {
    pub fn new(activity: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            activity: activity.into(),
            email: email.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityCard {
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    pub spots_left: i64,
    pub rows: Vec<RowTarget>,
}

impl ActivityCard {
    pub fn participant_count(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Everything one catalog fetch renders. Built once per successful fetch and
/// never patched afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub cards: Vec<ActivityCard>,
    pub options: Vec<SelectOption>,
}

impl Default for BoardView {
    fn default() -> Self {
        Self {
            cards: Vec::new(),
            options: vec![placeholder_option()],
        }
    }
}

impl BoardView {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut view = BoardView::default();
        for (name, activity) in catalog {
            view.cards.push(ActivityCard {
                name: name.clone(),
                description: activity.description.clone(),
                schedule: activity.schedule.clone(),
                max_participants: activity.max_participants,
                spots_left: activity.spots_left(),
                rows: activity
                    .participants
                    .iter()
                    .map(|email| RowTarget::new(name.clone(), email.clone()))
                    .collect(),
            });
            view.options.push(SelectOption {
                value: name.clone(),
                label: name.clone(),
            });
        }
        view
    }

    pub fn card(&self, name: &str) -> Option<&ActivityCard> {
        self.cards.iter().find(|card| card.name == name)
    }

    pub fn contains_row(&self, target: &RowTarget) -> bool {
        self.card(&target.activity)
            .is_some_and(|card| card.rows.contains(target))
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|option| option.value == value)
    }
}

fn placeholder_option() -> SelectOption {
    SelectOption {
        value: String::new(),
        label: SELECT_PLACEHOLDER.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListRegion {
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub email: String,
    /// Selected option value; empty means the placeholder.
    pub activity: String,
}

impl SignupForm {
    pub fn reset(&mut self) {
        self.email.clear();
        self.activity.clear();
    }

    pub fn is_complete(&self) -> bool {
        !self.email.trim().is_empty() && !self.activity.is_empty()
    }
}

/// A snapshot of everything on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub region: ListRegion,
    pub view: BoardView,
    pub form: SignupForm,
    pub status: Option<StatusMessage>,
}

impl Screen {
    pub fn ready(view: BoardView) -> Self {
        Self {
            region: ListRegion::Ready,
            view,
            form: SignupForm::default(),
            status: None,
        }
    }

    /// Rows are only clickable while the list region shows them.
    pub fn live_row(&self, target: &RowTarget) -> bool {
        self.region == ListRegion::Ready && self.view.contains_row(target)
    }
}
