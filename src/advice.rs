//! Per-phase wellbeing tips, adjusted for the day's logged symptoms.
//!
//! Purely presentational: nothing here feeds back into classification.

use serde::{Deserialize, Serialize};

use crate::models::{CyclePhase, Mood, Pain, SymptomLog};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Advice {
    pub nutrition: String,
    pub wellness: String,
}

fn base(phase: CyclePhase) -> (&'static str, &'static str) {
    match phase {
        CyclePhase::Menstrual => (
            "Favour iron-rich foods such as spinach and lentils to make up for losses. Ginger can ease cramps.",
            "Choose gentle movement like yoga or walking. A warm bath can relax muscles and soothe pain.",
        ),
        CyclePhase::Follicular => (
            "Refuel with complex carbohydrates (oats, quinoa) and lean protein.",
            "Energy is rising. A good time for more intense sessions such as running or cardio.",
        ),
        CyclePhase::Ovulation => (
            "Support your liver with cruciferous vegetables (broccoli, cauliflower) and antioxidant-rich berries.",
            "Energy and sociability peak now. Ideal for group activities or strength training.",
        ),
        CyclePhase::Luteal => (
            "Cut back on sugar and caffeine to steady your mood. Magnesium (dark chocolate, almonds) helps with cramps.",
            "Prefer calming activities like meditation or reading. If irritable, moderate exercise can help.",
        ),
        CyclePhase::Unknown => (
            "Stay hydrated and keep a balanced diet throughout your cycle.",
            "Listen to your body and adjust your activities to your energy level.",
        ),
    }
}

/// Advice for a phase, personalised by the symptom log when one is given.
pub fn advice_for(phase: CyclePhase, symptom: Option<&SymptomLog>) -> Advice {
    let (nutrition, wellness) = base(phase);
    let mut wellness = wellness.to_string();

    if let Some(log) = symptom {
        let pain_tip = match log.pain {
            Pain::None => None,
            Pain::Light => Some("Gentle stretching or a short walk can ease the discomfort."),
            Pain::Moderate => Some("A hot water bottle on the lower belly or back can bring real relief."),
            Pain::Severe => Some(
                "Rest matters. Slow down, and consider a painkiller if a doctor has approved one.",
            ),
        };
        if let Some(tip) = pain_tip {
            wellness.push(' ');
            wellness.push_str(tip);
        }

        if matches!(log.mood, Mood::Irritable | Mood::Sad) {
            wellness.push_str(
                " A calming herbal tea (chamomile, verbena) or a few minutes of meditation can help you refocus.",
            );
        }
    }

    Advice {
        nutrition: nutrition.to_string(),
        wellness,
    }
}
