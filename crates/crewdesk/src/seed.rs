// SPDX-FileCopyrightText: 2026 Crewdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Startup seed data: FAQs and mock CRM records.
//!
//! The store is empty on every boot, so a small catalog of FAQs and a
//! handful of CRM customers are loaded here to make the system usable
//! out of the box.

use tracing::info;

use crewdesk_core::types::{NewCrmRecord, NewFaq};
use crewdesk_core::{CrewdeskError, Store};

/// Seeds the store with the built-in FAQ catalog and mock CRM records.
pub async fn seed_store(store: &dyn Store) -> Result<(), CrewdeskError> {
    for faq in faq_catalog() {
        store.create_faq(faq).await?;
    }
    for record in crm_records() {
        store.create_crm_record(record).await?;
    }

    info!("seed data loaded");
    Ok(())
}

fn faq_catalog() -> Vec<NewFaq> {
    vec![
        NewFaq {
            question: "How do I reset my password?".into(),
            answer: "Open the sign-in page and choose \"Forgot password\". \
                     A reset link will be emailed to you and stays valid for one hour."
                .into(),
            language: Some("en".into()),
            category: Some("account".into()),
        },
        NewFaq {
            question: "How can I track my order?".into(),
            answer: "Your order confirmation email contains a tracking link. \
                     You can also find it under Orders in your account."
                .into(),
            language: Some("en".into()),
            category: Some("shipping".into()),
        },
        NewFaq {
            question: "What is your refund policy?".into(),
            answer: "Purchases can be refunded within 30 days of delivery. \
                     Refunds are issued to the original payment method within 5 business days."
                .into(),
            language: Some("en".into()),
            category: Some("billing".into()),
        },
        NewFaq {
            question: "Do you ship internationally?".into(),
            answer: "Yes, we ship to most countries. International delivery \
                     usually takes 7 to 14 business days."
                .into(),
            language: Some("en".into()),
            category: Some("shipping".into()),
        },
        NewFaq {
            question: "Comment puis-je réinitialiser mon mot de passe ?".into(),
            answer: "Sur la page de connexion, cliquez sur « Mot de passe oublié ». \
                     Un lien de réinitialisation vous sera envoyé par e-mail."
                .into(),
            language: Some("fr".into()),
            category: Some("account".into()),
        },
    ]
}

fn crm_records() -> Vec<NewCrmRecord> {
    vec![
        NewCrmRecord {
            customer_id: "CUST001".into(),
            name: "Alice Johnson".into(),
            email: "alice.johnson@example.com".into(),
            details: serde_json::json!({
                "tier": "gold",
                "orders": 14,
                "signedUp": "2023-04-12"
            }),
            preferred_language: Some("en".into()),
        },
        NewCrmRecord {
            customer_id: "CUST002".into(),
            name: "Carlos Mendez".into(),
            email: "carlos.mendez@example.com".into(),
            details: serde_json::json!({
                "tier": "silver",
                "orders": 3,
                "signedUp": "2024-09-30"
            }),
            preferred_language: Some("es".into()),
        },
        NewCrmRecord {
            customer_id: "CUST003".into(),
            name: "Marie Dubois".into(),
            email: "marie.dubois@example.com".into(),
            details: serde_json::json!({
                "tier": "gold",
                "orders": 27,
                "signedUp": "2022-11-02"
            }),
            preferred_language: Some("fr".into()),
        },
    ]
}
