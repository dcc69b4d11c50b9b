//! Built-in 20-question bank

use super::{AnswerOption, Question, PHASES};
use crate::dimension::Dimension::{
    self, ControlStructure as CS, EmotionalDepth as ED, LoveSacrifice as LS,
    RiskOrientation as RO, SocialEnergy as SE,
};
use crate::score::ScoreDelta;

type OptionSpec = (&'static str, &'static [(Dimension, i32)]);

const QUESTIONS: [(&str, [OptionSpec; 4]); 20] = [
    (
        "When plans change at the last minute, you usually…",
        [
            ("Adapt instantly", &[(RO, 3), (SE, 1)]),
            ("Feel frustrated but go along", &[(CS, 2), (ED, 1)]),
            ("Take charge and redirect", &[(CS, 3)]),
            ("Check on how others feel first", &[(LS, 2), (SE, 2)]),
        ],
    ),
    (
        "A close friend shares a secret. Your first instinct is to…",
        [
            ("Protect it at all costs", &[(LS, 3), (ED, 1)]),
            ("Analyze what it means", &[(CS, 2)]),
            ("Share advice right away", &[(SE, 2), (RO, 1)]),
            ("Feel deeply honored", &[(ED, 3)]),
        ],
    ),
    (
        "You're at a party where you know nobody. You…",
        [
            ("Introduce yourself to everyone", &[(SE, 3), (RO, 1)]),
            ("Find one person to talk to deeply", &[(ED, 3)]),
            ("Observe from the sidelines", &[(CS, 2)]),
            ("Leave early", &[(LS, 1), (CS, 1)]),
        ],
    ),
    (
        "When making a tough decision, you rely most on…",
        [
            ("Logic and analysis", &[(CS, 3)]),
            ("Gut feeling", &[(RO, 2), (ED, 2)]),
            ("What others think", &[(SE, 2), (LS, 1)]),
            ("Past experiences", &[(ED, 2), (CS, 1)]),
        ],
    ),
    (
        "Your ideal weekend looks like…",
        [
            ("A spontaneous adventure", &[(RO, 3), (SE, 1)]),
            ("Quality time with loved ones", &[(ED, 2), (LS, 2)]),
            ("A perfectly planned schedule", &[(CS, 3)]),
            ("Helping someone in need", &[(LS, 3)]),
        ],
    ),
    (
        "When someone criticizes your work, you…",
        [
            ("Take it personally", &[(ED, 3)]),
            ("Use it to improve", &[(CS, 2), (RO, 1)]),
            ("Defend your position", &[(CS, 2), (RO, 2)]),
            ("Ask others for their opinion", &[(SE, 3)]),
        ],
    ),
    (
        "You find a wallet on the street. You…",
        [
            ("Return it immediately", &[(LS, 3)]),
            ("Look for ID and contact them", &[(CS, 2), (LS, 1)]),
            ("Turn it in to the police", &[(CS, 2)]),
            ("Post about it on social media", &[(SE, 3)]),
        ],
    ),
    (
        "In a group project, you naturally become the…",
        [
            ("Leader", &[(CS, 3)]),
            ("Mediator", &[(SE, 2), (LS, 2)]),
            ("Creative brain", &[(RO, 2), (ED, 2)]),
            ("Reliable worker", &[(LS, 2), (CS, 1)]),
        ],
    ),
    (
        "What keeps you up at night?",
        [
            ("Unfinished tasks", &[(CS, 3)]),
            ("Conversations I replayed", &[(ED, 3), (SE, 1)]),
            ("Exciting future plans", &[(RO, 2)]),
            ("Worrying about someone else", &[(LS, 3)]),
        ],
    ),
    (
        "Your communication style is best described as…",
        [
            ("Direct and clear", &[(CS, 3)]),
            ("Warm and empathetic", &[(ED, 2), (LS, 2)]),
            ("Energetic and expressive", &[(SE, 3), (RO, 1)]),
            ("Thoughtful and reserved", &[(ED, 3)]),
        ],
    ),
    (
        "When facing a fear, you tend to…",
        [
            ("Confront it head on", &[(RO, 3)]),
            ("Plan a safe approach", &[(CS, 3)]),
            ("Talk about it with friends", &[(SE, 2), (ED, 1)]),
            ("Avoid it altogether", &[(LS, 1)]),
        ],
    ),
    (
        "The trait you value most in others is…",
        [
            ("Honesty", &[(CS, 1), (ED, 2)]),
            ("Kindness", &[(LS, 3)]),
            ("Courage", &[(RO, 3)]),
            ("Humor", &[(SE, 3)]),
        ],
    ),
    (
        "When you feel overwhelmed, you…",
        [
            ("Make a list and organize", &[(CS, 3)]),
            ("Seek comfort from someone", &[(ED, 2), (SE, 2)]),
            ("Do something reckless", &[(RO, 3)]),
            ("Put others first anyway", &[(LS, 3)]),
        ],
    ),
    (
        "Your dream job would involve…",
        [
            ("Leading a team", &[(CS, 3), (SE, 1)]),
            ("Helping people directly", &[(LS, 3)]),
            ("Creative expression", &[(ED, 3)]),
            ("High-stakes challenges", &[(RO, 3)]),
        ],
    ),
    (
        "How do you handle conflict?",
        [
            ("Address it directly", &[(CS, 2), (RO, 2)]),
            ("Try to keep the peace", &[(LS, 2), (SE, 2)]),
            ("Reflect on my feelings first", &[(ED, 3)]),
            ("Seek a mediator", &[(SE, 3)]),
        ],
    ),
    (
        "What describes your relationship with money?",
        [
            ("I budget everything", &[(CS, 3)]),
            ("I spend on experiences", &[(RO, 2), (SE, 2)]),
            ("I give generously", &[(LS, 3)]),
            ("I invest emotionally in things", &[(ED, 2)]),
        ],
    ),
    (
        "If you could have one superpower…",
        [
            ("Mind reading", &[(CS, 3), (ED, 1)]),
            ("Healing others", &[(LS, 3)]),
            ("Invisibility", &[(RO, 2), (ED, 2)]),
            ("Super charisma", &[(SE, 3)]),
        ],
    ),
    (
        "When watching a sad movie, you…",
        [
            ("Cry openly", &[(ED, 3)]),
            ("Hold back tears", &[(CS, 2)]),
            ("Comfort whoever I'm with", &[(LS, 2), (SE, 2)]),
            ("Analyze the filmmaking", &[(CS, 2), (RO, 1)]),
        ],
    ),
    (
        "People often come to you for…",
        [
            ("Advice and solutions", &[(CS, 3)]),
            ("Emotional support", &[(ED, 2), (LS, 2)]),
            ("Fun and energy", &[(SE, 3)]),
            ("A reality check", &[(RO, 2), (CS, 1)]),
        ],
    ),
    (
        "Your life motto would be…",
        [
            ("Stay in control", &[(CS, 3)]),
            ("Feel everything deeply", &[(ED, 3)]),
            ("Live on the edge", &[(RO, 3)]),
            ("Others before self", &[(LS, 3)]),
        ],
    ),
];

/// Five questions per phase
const QUESTIONS_PER_PHASE: usize = 5;

pub(super) fn questions() -> Vec<Question> {
    QUESTIONS
        .iter()
        .zip(1u32..)
        .enumerate()
        .map(|(i, ((text, options), id))| Question {
            id,
            text: (*text).to_string(),
            phase: PHASES
                .get(i / QUESTIONS_PER_PHASE)
                .map(|p| (*p).to_string()),
            options: options
                .iter()
                .map(|(label, scores)| {
                    let delta = scores
                        .iter()
                        .fold(ScoreDelta::none(), |d, (dim, v)| d.with(*dim, *v));
                    AnswerOption::new(*label, delta)
                })
                .collect(),
        })
        .collect()
}
