//! Random demo entries for development builds.

use chrono::{DateTime, Duration, Months, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{Category, LifestyleItem, LogEntry};

struct Template {
    description: &'static str,
    category: Category,
    impact: f64,
    confidence: f64,
    recommendations: [&'static str; 2],
}

const POSITIVE: &[Template] = &[
    Template {
        description: "Getting 8 hours of sleep",
        category: Category::Sleep,
        impact: 0.000019,
        confidence: 0.9,
        recommendations: ["Maintain consistent sleep schedule", "Avoid screens before bed"],
    },
    Template {
        description: "Morning meditation for 15 minutes",
        category: Category::Stress,
        impact: 0.000019,
        confidence: 0.8,
        recommendations: ["Try guided meditation apps", "Increase duration gradually"],
    },
    Template {
        description: "30 minutes of moderate exercise",
        category: Category::Exercise,
        impact: 0.000038,
        confidence: 0.95,
        recommendations: ["Aim for 150 minutes weekly", "Mix cardio and strength training"],
    },
    Template {
        description: "Eating a vegetable-rich meal",
        category: Category::Diet,
        impact: 0.000029,
        confidence: 0.85,
        recommendations: [
            "Aim for 5 servings of vegetables daily",
            "Vary colors for diverse nutrients",
        ],
    },
    Template {
        description: "Quality time with friends",
        category: Category::Social,
        impact: 0.000019,
        confidence: 0.75,
        recommendations: [
            "Prioritize meaningful connections",
            "Schedule regular social activities",
        ],
    },
    Template {
        description: "Reading for 30 minutes",
        category: Category::Habits,
        impact: 0.000010,
        confidence: 0.7,
        recommendations: ["Choose engaging material", "Make it a daily habit"],
    },
    Template {
        description: "Drinking 8 glasses of water",
        category: Category::Diet,
        impact: 0.000019,
        confidence: 0.8,
        recommendations: ["Carry a water bottle", "Set hydration reminders"],
    },
];

const NEGATIVE: &[Template] = &[
    Template {
        description: "Only sleeping 5 hours",
        category: Category::Sleep,
        impact: -0.000038,
        confidence: 0.9,
        recommendations: ["Prioritize sleep", "Create a bedtime routine"],
    },
    Template {
        description: "High stress workday",
        category: Category::Stress,
        impact: -0.000029,
        confidence: 0.8,
        recommendations: ["Practice stress management techniques", "Take short breaks"],
    },
    Template {
        description: "Sedentary day with no exercise",
        category: Category::Exercise,
        impact: -0.000038,
        confidence: 0.85,
        recommendations: ["Incorporate movement breaks", "Schedule exercise time"],
    },
    Template {
        description: "Fast food meal",
        category: Category::Diet,
        impact: -0.000048,
        confidence: 0.9,
        recommendations: [
            "Prepare meals in advance",
            "Choose healthier options when eating out",
        ],
    },
    Template {
        description: "Social isolation",
        category: Category::Social,
        impact: -0.000029,
        confidence: 0.75,
        recommendations: ["Reach out to friends or family", "Join community activities"],
    },
    Template {
        description: "Excessive screen time",
        category: Category::Habits,
        impact: -0.000019,
        confidence: 0.7,
        recommendations: ["Set screen time limits", "Take regular breaks"],
    },
    Template {
        description: "Alcohol consumption",
        category: Category::Habits,
        impact: -0.000057,
        confidence: 0.85,
        recommendations: ["Limit alcohol intake", "Have alcohol-free days"],
    },
];

const GOOD_DAY_OPENERS: &[&str] = &[
    "I had a productive day",
    "I felt energetic",
    "I made healthy choices",
];
const BAD_DAY_OPENERS: &[&str] = &[
    "I had a stressful day",
    "I felt tired",
    "I made some poor choices",
];

const SAMPLE_SOURCE: &str = "Research Journal of Health, 2023";
const MAX_ITEMS: usize = 4;

fn random_date<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> DateTime<Utc> {
    let start = now
        .checked_sub_months(Months::new(3))
        .unwrap_or(now - Duration::days(92));
    let span = (now - start).num_seconds().max(1);
    start + Duration::seconds(rng.gen_range(0..span))
}

fn sample_entry<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> LogEntry {
    let good_day = rng.gen_bool(0.5);
    let (templates, openers) = if good_day {
        (POSITIVE, GOOD_DAY_OPENERS)
    } else {
        (NEGATIVE, BAD_DAY_OPENERS)
    };

    let item_count = rng.gen_range(1..=MAX_ITEMS);
    let items: Vec<LifestyleItem> = (0..item_count)
        .filter_map(|index| {
            let template = templates.choose(rng)?;
            Some(LifestyleItem {
                id: format!("{}-{}", template.category, index + 1),
                description: template.description.to_string(),
                category: template.category,
                impact: template.impact,
                confidence: template.confidence,
                interactions: Vec::new(),
                recommendations: template.recommendations.iter().map(|r| r.to_string()).collect(),
                sources: vec![SAMPLE_SOURCE.to_string()],
            })
        })
        .collect();

    let opener = openers.choose(rng).copied().unwrap_or("Today");
    let details: Vec<&str> = items.iter().map(|item| item.description.as_str()).collect();
    let raw_content = format!("{opener} today. {}.", details.join(". "));

    let date = random_date(rng, now);
    let mut entry = LogEntry::new(raw_content, date, items);
    entry.created_at = date;
    entry
}

/// `count` random entries dated within the last three months, newest first.
pub fn generate_sample_entries<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<LogEntry> {
    let now = Utc::now();
    let mut entries: Vec<LogEntry> = (0..count).map(|_| sample_entry(rng, now)).collect();
    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn entries_are_recent_and_newest_first() {
        let mut rng = StdRng::seed_from_u64(7);
        let entries = generate_sample_entries(25, &mut rng);
        assert_eq!(entries.len(), 25);

        let now = Utc::now();
        let oldest_allowed = now - Duration::days(93);
        for entry in &entries {
            assert!(entry.date <= now && entry.date >= oldest_allowed);
            assert_eq!(entry.created_at, entry.date);
        }
        assert!(entries.windows(2).all(|pair| pair[0].date >= pair[1].date));
    }

    #[test]
    fn each_entry_is_consistent() {
        let mut rng = StdRng::seed_from_u64(42);
        for entry in generate_sample_entries(40, &mut rng) {
            assert!((1..=MAX_ITEMS).contains(&entry.items.len()));
            let sum: f64 = entry.items.iter().map(|i| i.impact).sum();
            assert!((entry.net_impact - sum).abs() < 1e-12);

            // A sample day is uniformly good or uniformly bad.
            let positive = entry.items.iter().filter(|i| i.impact > 0.0).count();
            assert!(positive == 0 || positive == entry.items.len());

            for item in &entry.items {
                assert!(entry.raw_content.contains(&item.description));
            }
        }
    }

    #[test]
    fn same_seed_same_content() {
        let a = generate_sample_entries(5, &mut StdRng::seed_from_u64(3));
        let b = generate_sample_entries(5, &mut StdRng::seed_from_u64(3));
        let text = |entries: &[LogEntry]| -> Vec<String> {
            entries.iter().map(|e| e.raw_content.clone()).collect()
        };
        assert_eq!(text(&a), text(&b));
    }
}
