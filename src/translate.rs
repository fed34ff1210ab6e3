//! Static translation tables from provider vocabulary to display labels.
//!
//! Lookups trim their input. A value missing from a table is returned
//! trimmed but otherwise unchanged, so callers can show it as-is.

pub const DIRECTION_LABELS: &[(&str, &str)] = &[
    ("Inbound", "Recebida"),
    ("Outbound", "Realizada"),
    ("Internal", "Interna"),
];

pub const RESULT_LABELS: &[(&str, &str)] = &[
    ("Missed Call", RESULT_MISSED),
    ("Ended successfully", RESULT_ANSWERED),
    ("Voicemail", RESULT_VOICEMAIL),
    ("Rejected", RESULT_REJECTED),
    ("Internal", RESULT_INTERNAL),
    ("Busy", RESULT_BUSY),
    ("Failed", RESULT_FAILED),
    ("Hung up (on hold)", RESULT_HUNG_UP_ON_HOLD),
    ("Sent to voicemail", RESULT_SENT_TO_VOICEMAIL),
    ("Hung up (in queue)", RESULT_HUNG_UP_IN_QUEUE),
];

/// Monday-first; position + 1 is the weekday ordinal. Backs
/// [`crate::record::Weekday::label`], which is total over the calendar.
pub const WEEKDAY_LABELS: [(&str, &str); 7] = [
    ("Monday", "Segunda"),
    ("Tuesday", "Terça"),
    ("Wednesday", "Quarta"),
    ("Thursday", "Quinta"),
    ("Friday", "Sexta"),
    ("Saturday", "Sábado"),
    ("Sunday", "Domingo"),
];

pub const RESULT_MISSED: &str = "Perdida";
pub const RESULT_ANSWERED: &str = "Atendida";
pub const RESULT_VOICEMAIL: &str = "Correio de Voz";
pub const RESULT_REJECTED: &str = "Rejeitada";
pub const RESULT_INTERNAL: &str = "Interna";
pub const RESULT_BUSY: &str = "Ocupado";
pub const RESULT_FAILED: &str = "Falha";
pub const RESULT_HUNG_UP_ON_HOLD: &str = "Desligou na Espera";
pub const RESULT_SENT_TO_VOICEMAIL: &str = "Enviado p/ Correio de Voz";
pub const RESULT_HUNG_UP_IN_QUEUE: &str = "Desligou na Fila";

pub fn direction_label(raw: &str) -> &str {
    lookup(DIRECTION_LABELS, raw)
}

pub fn result_label(raw: &str) -> &str {
    lookup(RESULT_LABELS, raw)
}

fn lookup<'a>(table: &'static [(&'static str, &'static str)], raw: &'a str) -> &'a str {
    let trimmed = raw.trim();
    table
        .iter()
        .find(|(source, _)| *source == trimmed)
        .map(|(_, label)| *label)
        .unwrap_or(trimmed)
}
