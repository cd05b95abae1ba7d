//! Lookup tables for the icons and labels of indicator categories and the
//! colours and labels of transaction statuses.

use maud::{Markup, html};

/// The icons available for indicator categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Alert,
    Bank,
    Boleto,
    Card,
    CreditCard,
    DebitCard,
    Mastercard,
    Others,
    Visa,
}

impl Icon {
    /// The icon as inline SVG markup that follows the current text colour.
    pub fn svg(self) -> Markup {
        let shapes = match self {
            Self::Alert => html!(
                path d="M12 3 2 21h20L12 3z" {}
                path d="M12 9v5" {}
                circle cx="12" cy="17" r="1" fill="currentColor" {}
            ),
            Self::Bank => html!(
                path d="M3 10h18L12 4 3 10z" {}
                path d="M5 10v8M9 10v8M15 10v8M19 10v8M3 20h18" {}
            ),
            Self::Boleto => html!(
                path d="M4 5v14M7 5v14M9 5v14M12 5v14M14 5v14M17 5v14M20 5v14" {}
            ),
            Self::Card => card_outline(),
            Self::CreditCard => html!(
                (card_outline())
                path d="M6 15h4" {}
            ),
            Self::DebitCard => html!(
                (card_outline())
                path d="M6 15h2M10 15h2" {}
            ),
            Self::Mastercard => html!(
                circle cx="9" cy="12" r="5" fill="#eb001b" stroke="none" {}
                circle cx="15" cy="12" r="5" fill="#f79e1b" fill-opacity="0.8" stroke="none" {}
            ),
            Self::Others => html!(
                circle cx="6" cy="12" r="1.5" fill="currentColor" {}
                circle cx="12" cy="12" r="1.5" fill="currentColor" {}
                circle cx="18" cy="12" r="1.5" fill="currentColor" {}
            ),
            Self::Visa => html!(
                (card_outline())
                text
                    x="12"
                    y="16"
                    text-anchor="middle"
                    font-size="7"
                    font-weight="bold"
                    fill="#1a1f71"
                    stroke="none"
                {
                    "VISA"
                }
            ),
        };

        html!(
            svg
                xmlns="http://www.w3.org/2000/svg"
                viewBox="0 0 24 24"
                fill="none"
                stroke="currentColor"
                stroke-width="1.5"
                stroke-linecap="round"
                stroke-linejoin="round"
                aria-hidden="true"
                class="w-6 h-6 shrink-0"
            {
                (shapes)
            }
        )
    }
}

fn card_outline() -> Markup {
    html!(
        rect x="2" y="5" width="20" height="14" rx="2" {}
        path d="M2 10h20" {}
    )
}

/// The icon and display label for a known indicator category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorStyle {
    pub icon: Icon,
    pub label: &'static str,
}

/// Look up the icon and label for the indicator category `title`.
///
/// Returns `None` for categories that are not in the table.
pub fn indicator_style(title: &str) -> Option<IndicatorStyle> {
    let (icon, label) = match title {
        "acquirer" => (Icon::Bank, "Acquirer"),
        "acquirer_timeout" => (Icon::Alert, "Acquirer timeout"),
        "antifraud" => (Icon::Alert, "Antifraud"),
        "boleto" => (Icon::Boleto, "Boleto"),
        "capture_timeout" => (Icon::Alert, "Capture timeout"),
        "credit_card" => (Icon::CreditCard, "Credit card"),
        "debit_card" => (Icon::DebitCard, "Debit card"),
        "internal_error" => (Icon::Alert, "Internal error"),
        "invalid_capture_amount" => (Icon::Alert, "Invalid capture amount"),
        "manual_review" => (Icon::Alert, "Manual review"),
        "manual_review_timeout" => (Icon::Alert, "Manual review timeout"),
        "mastercard" => (Icon::Mastercard, "Mastercard"),
        "no_acquirer" => (Icon::Alert, "No acquirer"),
        "others" => (Icon::Others, "Others"),
        "unknown" => (Icon::Card, "Unknown"),
        "visa" => (Icon::Visa, "Visa"),
        _ => return None,
    };

    Some(IndicatorStyle { icon, label })
}

/// The colour and label used to display a transaction status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLegend {
    pub color: &'static str,
    pub text: &'static str,
}

/// Look up the legend for the transaction status `status`.
pub fn status_legend(status: &str) -> Option<StatusLegend> {
    let (color, text) = match status {
        "analyzing" => ("#951d3c", "Analyzing"),
        "authorized" => ("#41535b", "Authorized"),
        "chargedback" => ("#b51d5b", "Chargedback"),
        "paid" => ("#57be76", "Paid"),
        "pending_refund" => ("#8e3f8c", "Pending refund"),
        "pending_review" => ("#c46fb0", "Pending review"),
        "processing" => ("#3d3a96", "Processing"),
        "refunded" => ("#4ca9d7", "Refunded"),
        "refused" => ("#e74f4f", "Refused"),
        "waiting_payment" => ("#f8a200", "Waiting payment"),
        _ => return None,
    };

    Some(StatusLegend { color, text })
}
