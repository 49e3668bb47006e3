//! Message templates for reminder notifications.
//!
//! Templates come in day-specific variants keyed by the matched
//! notification interval (the 7-day, 3-day and 1-day texts differ in
//! urgency), with a generic fallback for any other configured offset.
//! The catalog is read-only configuration; per-station overrides are
//! loaded over the defaults at startup.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One renderable template (subject is ignored for SMS)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub subject: String,
    pub body: String,
}

/// Placeholder values substituted into templates
#[derive(Debug, Clone)]
pub struct TemplateVars {
    /// Vehicle plate number
    pub plate: String,
    /// Document label (ITP / RCA / Rovinieta)
    pub doc_type: String,
    /// Days left until the document expires
    pub days_left: i64,
    /// Expiry date, already formatted for display
    pub expiry_date: String,
}

impl MessageTemplate {
    /// Substitute `{plate}`, `{type}`, `{days}` and `{expiry_date}`
    /// placeholders into the body
    pub fn render_body(&self, vars: &TemplateVars) -> String {
        Self::substitute(&self.body, vars)
    }

    /// Substitute placeholders into the subject
    pub fn render_subject(&self, vars: &TemplateVars) -> String {
        Self::substitute(&self.subject, vars)
    }

    fn substitute(text: &str, vars: &TemplateVars) -> String {
        text.replace("{plate}", &vars.plate)
            .replace("{type}", &vars.doc_type)
            .replace("{days}", &vars.days_left.to_string())
            .replace("{expiry_date}", &vars.expiry_date)
    }
}

/// Per-channel template variants keyed by notification interval
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    sms: HashMap<u32, MessageTemplate>,
    email: HashMap<u32, MessageTemplate>,
    sms_default: MessageTemplate,
    email_default: MessageTemplate,
}

impl TemplateCatalog {
    /// Template for an SMS at the given interval
    pub fn sms_for(&self, interval: u32) -> &MessageTemplate {
        self.sms.get(&interval).unwrap_or(&self.sms_default)
    }

    /// Template for an email at the given interval
    pub fn email_for(&self, interval: u32) -> &MessageTemplate {
        self.email.get(&interval).unwrap_or(&self.email_default)
    }

    /// Override the SMS template for one interval
    pub fn set_sms(&mut self, interval: u32, template: MessageTemplate) {
        self.sms.insert(interval, template);
    }

    /// Override the email template for one interval
    pub fn set_email(&mut self, interval: u32, template: MessageTemplate) {
        self.email.insert(interval, template);
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        let sms_default = MessageTemplate {
            subject: String::new(),
            body: "ReviAuto: {type} pentru {plate} expira in {days} zile ({expiry_date}). \
                   Programeaza-te din timp."
                .to_string(),
        };
        let email_default = MessageTemplate {
            subject: "{type} pentru {plate} expira in {days} zile".to_string(),
            body: "Buna ziua,\n\n{type} pentru vehiculul {plate} expira pe {expiry_date}, \
                   adica in {days} zile.\n\nEchipa ReviAuto"
                .to_string(),
        };

        let mut sms = HashMap::new();
        sms.insert(
            7,
            MessageTemplate {
                subject: String::new(),
                body: "ReviAuto: {type} pentru {plate} expira pe {expiry_date}, peste o \
                       saptamana. Programeaza-te din timp."
                    .to_string(),
            },
        );
        sms.insert(
            3,
            MessageTemplate {
                subject: String::new(),
                body: "ReviAuto: {type} pentru {plate} expira in 3 zile ({expiry_date}). \
                       Nu uita sa te programezi."
                    .to_string(),
            },
        );
        sms.insert(
            1,
            MessageTemplate {
                subject: String::new(),
                body: "ReviAuto: ATENTIE, {type} pentru {plate} expira MAINE ({expiry_date})."
                    .to_string(),
            },
        );

        let mut email = HashMap::new();
        email.insert(
            7,
            MessageTemplate {
                subject: "{type} pentru {plate} expira intr-o saptamana".to_string(),
                body: "Buna ziua,\n\n{type} pentru vehiculul {plate} expira pe {expiry_date}, \
                       peste o saptamana.\n\nEchipa ReviAuto"
                    .to_string(),
            },
        );
        email.insert(
            3,
            MessageTemplate {
                subject: "{type} pentru {plate} expira in 3 zile".to_string(),
                body: "Buna ziua,\n\n{type} pentru vehiculul {plate} expira pe {expiry_date}, \
                       in 3 zile.\n\nEchipa ReviAuto"
                    .to_string(),
            },
        );
        email.insert(
            1,
            MessageTemplate {
                subject: "{type} pentru {plate} expira maine".to_string(),
                body: "Buna ziua,\n\nATENTIE: {type} pentru vehiculul {plate} expira maine, \
                       {expiry_date}.\n\nEchipa ReviAuto"
                    .to_string(),
            },
        );

        Self {
            sms,
            email,
            sms_default,
            email_default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> TemplateVars {
        TemplateVars {
            plate: "B123ABC".to_string(),
            doc_type: "ITP".to_string(),
            days_left: 3,
            expiry_date: "2025-03-15".to_string(),
        }
    }

    #[test]
    fn test_render_substitutes_all_placeholders() {
        let template = MessageTemplate {
            subject: "{type} {plate}".to_string(),
            body: "{type} for {plate} expires in {days} days on {expiry_date}".to_string(),
        };
        let body = template.render_body(&vars());
        assert_eq!(body, "ITP for B123ABC expires in 3 days on 2025-03-15");
        assert_eq!(template.render_subject(&vars()), "ITP B123ABC");
    }

    #[test]
    fn test_catalog_selects_interval_variant() {
        let catalog = TemplateCatalog::default();
        assert!(catalog.sms_for(1).body.contains("MAINE"));
        assert!(catalog.email_for(7).subject.contains("saptamana"));
    }

    #[test]
    fn test_catalog_falls_back_for_unknown_interval() {
        let catalog = TemplateCatalog::default();
        let body = catalog.sms_for(14).render_body(&TemplateVars {
            days_left: 14,
            ..vars()
        });
        assert!(body.contains("14 zile"));
    }

    #[test]
    fn test_catalog_override() {
        let mut catalog = TemplateCatalog::default();
        catalog.set_sms(
            3,
            MessageTemplate {
                subject: String::new(),
                body: "custom {plate}".to_string(),
            },
        );
        assert_eq!(catalog.sms_for(3).render_body(&vars()), "custom B123ABC");
    }
}
