#![allow(dead_code)]

use ticket_classifier::{DatasetCurator, ModelArtifact, Ticket, Trainer, TrainingSample};

const LOGIN: &[&str] = &[
    "I forgot my password and cannot log into my account",
    "Password reset email never arrived",
    "My account is locked after too many attempts",
    "Cannot remember my username",
    "Login page rejects my password",
    "Two factor authentication code not accepted",
    "Need access to the shared account",
    "Account locked, please reset my password",
];

const BILLING: &[&str] = &[
    "I was charged twice for the same order",
    "Please refund my last payment",
    "The invoice amount is wrong",
    "Why did the price of my plan go up",
    "Payment failed but money left my bank",
    "Need a copy of my invoice for taxes",
    "Unexpected charge on my credit card",
    "Refund has not arrived after two weeks",
];

const TECHNICAL: &[&str] = &[
    "The application crashes when I open reports",
    "Getting an error message on startup",
    "Software update broke the export feature",
    "Network connection drops every few minutes",
    "Printer hardware not detected by the system",
    "Found a bug in the search screen",
    "The system is extremely slow today",
    "Crash when uploading large files",
];

const OTHER: &[&str] = &["Thank you for the quick help", "Have a nice weekend", "Who is my contact person"];

/// A raw ticket corpus with `copies` variants of every template.
pub fn tickets(copies: usize) -> Vec<Ticket> {
    let mut tickets = Vec::new();
    for i in 0..copies {
        for group in [LOGIN, BILLING, TECHNICAL, OTHER] {
            for text in group {
                tickets.push(Ticket::new(format!("{} (ref {})", text, i)));
            }
        }
    }
    tickets
}

pub fn sample() -> TrainingSample {
    DatasetCurator::english().curate(&tickets(4), 500, 42).unwrap()
}

pub fn artifact() -> ModelArtifact {
    Trainer::builder().build().unwrap().train(&sample()).unwrap()
}
