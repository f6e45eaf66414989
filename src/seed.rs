use crate::models::{Activity, Catalog};

fn activity(description: &str, schedule: &str, max_participants: u32, participants: &[&str]) -> Activity {
    Activity {
        description: description.to_string(),
        schedule: schedule.to_string(),
        max_participants,
        participants: participants.iter().map(|p| p.to_string()).collect(),
    }
}

/// The activities a freshly started server offers.
pub fn seed_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.insert(
        "Chess Club".to_string(),
        activity(
            "Learn strategies and compete in chess tournaments",
            "Fridays, 3:30 PM - 5:00 PM",
            12,
            &["michael@mergington.edu", "daniel@mergington.edu"],
        ),
    );
    catalog.insert(
        "Programming Class".to_string(),
        activity(
            "Learn programming fundamentals and build software projects",
            "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
            20,
            &["emma@mergington.edu", "sophia@mergington.edu"],
        ),
    );
    catalog.insert(
        "Gym Class".to_string(),
        activity(
            "Physical education and sports activities",
            "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
            30,
            &["john@mergington.edu", "olivia@mergington.edu"],
        ),
    );
    catalog.insert(
        "Soccer Team".to_string(),
        activity(
            "Join the school soccer team and compete in matches",
            "Tuesdays and Thursdays, 4:00 PM - 5:30 PM",
            22,
            &["liam@mergington.edu", "noah@mergington.edu"],
        ),
    );
    catalog.insert(
        "Basketball Team".to_string(),
        activity(
            "Practice and play basketball with the school team",
            "Wednesdays and Fridays, 3:30 PM - 5:00 PM",
            15,
            &["ava@mergington.edu", "mia@mergington.edu"],
        ),
    );
    catalog.insert(
        "Tennis Club".to_string(),
        activity(
            "Improve your serve and play friendly tennis matches",
            "Mondays and Thursdays, 4:00 PM - 5:00 PM",
            10,
            &["lucas@mergington.edu"],
        ),
    );
    catalog.insert(
        "Art Club".to_string(),
        activity(
            "Explore your creativity through painting and drawing",
            "Thursdays, 3:30 PM - 5:00 PM",
            15,
            &["amelia@mergington.edu", "harper@mergington.edu"],
        ),
    );
    catalog.insert(
        "Drama Club".to_string(),
        activity(
            "Act, direct, and produce plays and performances",
            "Mondays and Wednesdays, 4:00 PM - 5:30 PM",
            20,
            &["ella@mergington.edu", "scarlett@mergington.edu"],
        ),
    );
    catalog.insert(
        "Math Club".to_string(),
        activity(
            "Solve challenging problems and participate in math competitions",
            "Tuesdays, 3:30 PM - 4:30 PM",
            10,
            &["james@mergington.edu", "benjamin@mergington.edu"],
        ),
    );
    catalog
}
