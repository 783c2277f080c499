/*!
 * Built-in seed vocabulary.
 *
 * Used when the terminology files are missing or unreadable, so the pipeline
 * keeps producing usable output in degraded mode.
 */

use super::store::{TermEntry, TermTable};

/// (english, arabic, category, definition)
type SeedRow = (&'static str, &'static str, &'static str, Option<&'static str>);

const DOMAIN_SEED: &[SeedRow] = &[
    ("fever", "حمى", "symptom", Some("Body temperature above the normal range")),
    ("headache", "صداع", "symptom", Some("Pain in the head or upper neck")),
    ("cough", "سعال", "symptom", None),
    ("nausea", "غثيان", "symptom", None),
    ("vomiting", "قيء", "symptom", None),
    ("dizziness", "دوخة", "symptom", None),
    ("fatigue", "إرهاق", "symptom", None),
    ("pain", "ألم", "symptom", None),
    ("rash", "طفح جلدي", "symptom", None),
    ("diarrhea", "إسهال", "symptom", None),
    ("diabetes", "السكري", "condition", Some("Chronic disorder of blood glucose regulation")),
    ("hypertension", "ارتفاع ضغط الدم", "condition", Some("Persistently elevated arterial blood pressure")),
    ("asthma", "الربو", "condition", None),
    ("infection", "عدوى", "condition", None),
    ("pneumonia", "التهاب رئوي", "condition", Some("Infection that inflames the air sacs of the lungs")),
    ("allergy", "حساسية", "condition", None),
    ("fracture", "كسر", "condition", None),
    ("anemia", "فقر الدم", "condition", None),
    ("antibiotic", "مضاد حيوي", "medication", None),
    ("antibiotics", "مضادات حيوية", "medication", None),
    ("paracetamol", "باراسيتامول", "medication", None),
    ("insulin", "الأنسولين", "medication", None),
    ("tablet", "قرص", "medication", None),
    ("tablets", "أقراص", "medication", None),
    ("dose", "جرعة", "medication", None),
    ("injection", "حقنة", "procedure", None),
    ("surgery", "جراحة", "procedure", None),
    ("patient", "المريض", "person", None),
    ("doctor", "الطبيب", "person", None),
    ("nurse", "الممرضة", "person", None),
    ("hospital", "المستشفى", "facility", None),
    ("heart", "القلب", "anatomy", None),
    ("lung", "الرئة", "anatomy", None),
    ("lungs", "الرئتين", "anatomy", None),
    ("kidney", "الكلية", "anatomy", None),
    ("liver", "الكبد", "anatomy", None),
    ("blood", "الدم", "anatomy", None),
    ("chest", "الصدر", "anatomy", None),
    ("abdomen", "البطن", "anatomy", None),
    ("symptoms", "الأعراض", "clinical", None),
    ("treatment", "العلاج", "clinical", None),
];

const GENERAL_SEED: &[SeedRow] = &[
    ("day", "يوم", "time", None),
    ("days", "أيام", "time", None),
    ("week", "أسبوع", "time", None),
    ("weeks", "أسابيع", "time", None),
    ("month", "شهر", "time", None),
    ("months", "أشهر", "time", None),
    ("year", "سنة", "time", None),
    ("years", "سنوات", "time", None),
    ("morning", "الصباح", "time", None),
    ("night", "الليل", "time", None),
    ("pain", "وجع", "general", None),
    ("left", "الأيسر", "general", None),
    ("right", "الأيمن", "general", None),
    ("severe", "شديد", "general", None),
    ("mild", "خفيف", "general", None),
    ("normal", "طبيعي", "general", None),
    ("high", "مرتفع", "general", None),
    ("low", "منخفض", "general", None),
    ("stable", "مستقر", "general", None),
    ("condition", "الحالة", "general", None),
    ("water", "الماء", "general", None),
    ("food", "الطعام", "general", None),
    ("rest", "الراحة", "general", None),
    ("home", "المنزل", "general", None),
    ("family", "العائلة", "general", None),
    ("male", "ذكر", "general", None),
    ("female", "أنثى", "general", None),
];

fn build(rows: &[SeedRow]) -> TermTable {
    TermTable::from_entries(rows.iter().map(|(english, arabic, category, definition)| {
        TermEntry::new(english, arabic)
            .with_category(Some(*category))
            .with_definition(*definition)
    }))
}

/// Seed entries for the domain table.
pub fn domain_seed() -> TermTable {
    build(DOMAIN_SEED)
}

/// Seed entries for the general table.
pub fn general_seed() -> TermTable {
    build(GENERAL_SEED)
}
