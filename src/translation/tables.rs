/*!
 * Built-in rule tables.
 *
 * Every table is an ordered slice: position is priority, and several entries
 * rely on running before later ones (longer phrases before their sub-phrases,
 * "diagnosed with" before "patient has"). `{M}` stands for an optional
 * annotation marker and is expanded before compilation.
 */

/// (pattern, template, description)
pub type PatternRow = (&'static str, &'static str, &'static str);

/// (English phrase, Arabic replacement)
pub type PhraseRow = (&'static str, &'static str);

/// Multi-word clinical constructs rewritten into Arabic sentence templates.
pub const CONSTRUCT_RULES: &[PatternRow] = &[
    (
        r"(?i)\bblood{M}\s+pressure{M}(?:\s+(?:is|was|of|reading){M})?\s*:?\s*(\d{2,3})\s*/\s*(\d{2,3})\b",
        "ضغط الدم ${1}/${2}",
        "blood pressure reading",
    ),
    (
        r"(?i)\b(?:heart{M}\s+rate|pulse){M}(?:\s+(?:is|was|of){M})?\s*:?\s*(\d{2,3})(?:\s*(?:bpm|beats{M}\s+per{M}\s+minute))?\b{M}",
        "معدل ضربات القلب ${1} نبضة في الدقيقة",
        "heart rate reading",
    ),
    // Fahrenheit needs its explicit unit; a bare reading is Celsius
    (
        r"(?i)\btemperature{M}(?:\s+(?:is|was|of){M})?\s*:?\s*(\d{2,3}(?:\.\d+)?)\s*°?\s*(?:fahrenheit|f)\b{M}",
        "درجة الحرارة ${1} درجة فهرنهايت",
        "temperature reading in fahrenheit",
    ),
    (
        r"(?i)\btemperature{M}(?:\s+(?:is|was|of){M})?\s*:?\s*(\d{2,3}(?:\.\d+)?)(?:\s*°?\s*(?:celsius|c))?\b{M}",
        "درجة الحرارة ${1} درجة مئوية",
        "temperature reading",
    ),
    (
        r"(?i)\bpatient{M}\s+is{M}\s+(?:a{M}\s+)?(\d{1,3})(?:\s+|-)years?{M}(?:\s+|-)old{M}",
        "عمر المريض ${1} سنة",
        "patient age",
    ),
    (
        r"(?i)\bpatient{M}\s+(?:was|is|has{M}\s+been){M}\s+diagnosed{M}\s+with{M}\s+([^.!?\n]+)",
        "تم تشخيص المريض بـ ${1}",
        "patient diagnosed with",
    ),
    (
        r"(?i)\bpatient{M}\s+complains{M}\s+of{M}\s+([^.!?\n]+)",
        "يشكو المريض من ${1}",
        "patient complains of",
    ),
    (
        r"(?i)\bpatient{M}\s+(?:has|have|is{M}\s+having|presents{M}\s+with|presented{M}\s+with){M}\s+([^.!?\n]+)",
        "المريض يعاني من ${1}",
        "patient has",
    ),
    (
        r"(?i)\bno{M}\s+(?:known{M}\s+)?history{M}\s+of{M}\s+([^.!?\n]+)",
        "لا يوجد تاريخ مرضي لـ ${1}",
        "no history of",
    ),
    (
        r"(?i)\ballergic{M}\s+to{M}\s+([^.!?\n]+)",
        "لديه حساسية من ${1}",
        "allergic to",
    ),
    (
        r"(?i)\b(\d+(?:\.\d+)?)\s*mg\b{M}",
        "${1} ملغ",
        "dose in milligrams",
    ),
    (
        r"(?i)\b(\d+(?:\.\d+)?)\s*mcg\b{M}",
        "${1} ميكروغرام",
        "dose in micrograms",
    ),
    (
        r"(?i)\b(\d+(?:\.\d+)?)\s*ml\b{M}",
        "${1} مل",
        "volume in millilitres",
    ),
    (
        r"(?i)\b(\d+)\s+times{M}\s+(?:a|per){M}\s+day\b{M}",
        "${1} مرات يوميا",
        "doses per day",
    ),
    (
        r"(?i)\bfor{M}\s+(?:1|one){M}\s+days?\b{M}",
        "لمدة يوم واحد",
        "duration of one day",
    ),
    (
        r"(?i)\bfor{M}\s+(?:2|two){M}\s+days?\b{M}",
        "لمدة يومين",
        "duration of two days",
    ),
    (
        r"(?i)\bfor{M}\s+(\d+)\s+days?\b{M}",
        "لمدة ${1} أيام",
        "duration in days",
    ),
    (
        r"(?i)\bfor{M}\s+(?:1|one){M}\s+weeks?\b{M}",
        "لمدة أسبوع واحد",
        "duration of one week",
    ),
    (
        r"(?i)\bfor{M}\s+(?:2|two){M}\s+weeks?\b{M}",
        "لمدة أسبوعين",
        "duration of two weeks",
    ),
    (
        r"(?i)\bfor{M}\s+(\d+)\s+weeks?\b{M}",
        "لمدة ${1} أسابيع",
        "duration in weeks",
    ),
    (
        r"(?i)\bmm\s*hg\b{M}",
        "ملم زئبق",
        "pressure unit",
    ),
];

/// Closed table of common clinical phrases.
pub const PHRASE_TABLE: &[PhraseRow] = &[
    ("past medical history", "التاريخ المرضي السابق"),
    ("history of present illness", "تاريخ المرض الحالي"),
    ("medical history", "التاريخ المرضي"),
    ("family history", "التاريخ العائلي"),
    ("chief complaint", "الشكوى الرئيسية"),
    ("physical examination", "الفحص السريري"),
    ("clinical examination", "الفحص السريري"),
    ("vital signs", "العلامات الحيوية"),
    ("blood pressure", "ضغط الدم"),
    ("heart rate", "معدل ضربات القلب"),
    ("respiratory rate", "معدل التنفس"),
    ("blood test", "فحص الدم"),
    ("laboratory results", "نتائج المختبر"),
    ("shortness of breath", "ضيق التنفس"),
    ("chest pain", "ألم في الصدر"),
    ("side effects", "الآثار الجانبية"),
    ("treatment plan", "خطة العلاج"),
    ("follow up", "المتابعة"),
    ("follow-up", "المتابعة"),
    ("three times daily", "ثلاث مرات يوميا"),
    ("twice daily", "مرتين يوميا"),
    ("once daily", "مرة واحدة يوميا"),
    ("as needed", "عند الحاجة"),
    ("by mouth", "عن طريق الفم"),
    ("prescription", "الوصفة الطبية"),
    ("examination", "الفحص"),
    ("diagnosis", "التشخيص"),
    ("history", "التاريخ"),
];

/// Single-letter function words, matched case-sensitively so that letter
/// qualifiers such as "Hepatitis A" or "Type I" survive. Runs before
/// `FUNCTION_WORDS`.
pub const CASED_FUNCTION_WORDS: &[PatternRow] = &[
    (r"\ba\b{M}", "", "word 'a'"),
    (r"(?m)(^|[.!?]\s+)A\b{M}", "${1}", "sentence-initial word 'A'"),
    (
        r"(?m)(^|[.!?,;:]\s*|\b(?i:and|but|or|so|then|when|if|as|that|because|since){M}\s+)I\b{M}",
        "${1}أنا",
        "pronoun 'I'",
    ),
];

/// Function words and temporal adverbs. Multi-word entries come first.
pub const FUNCTION_WORDS: &[PhraseRow] = &[
    ("there is", "يوجد"),
    ("there are", "يوجد"),
    ("should be", "يجب أن يكون"),
    // articles
    ("the", "ال"),
    ("an", ""),
    // copulas
    ("is", ""),
    ("are", ""),
    ("am", ""),
    ("been", ""),
    ("was", "كان"),
    ("were", "كانوا"),
    ("be", "يكون"),
    // pronouns
    ("he", "هو"),
    ("she", "هي"),
    ("they", "هم"),
    ("we", "نحن"),
    ("you", "أنت"),
    ("his", "الخاص به"),
    ("her", "الخاص بها"),
    ("their", "الخاص بهم"),
    ("this", "هذا"),
    ("that", "ذلك"),
    ("these", "هذه"),
    ("which", "الذي"),
    ("who", "الذي"),
    // modal verbs
    ("should", "يجب"),
    ("must", "يجب"),
    ("can", "يمكن"),
    ("could", "يمكن"),
    ("may", "قد"),
    ("might", "قد"),
    ("will", "سوف"),
    ("would", "سوف"),
    // possession
    ("has", "لديه"),
    ("have", "لديه"),
    ("had", "كان لديه"),
    // conjunctions and prepositions
    ("and", "و"),
    ("or", "أو"),
    ("but", "لكن"),
    ("without", "بدون"),
    ("with", "مع"),
    ("in", "في"),
    ("on", "على"),
    ("at", "في"),
    ("from", "من"),
    ("to", "إلى"),
    ("of", "من"),
    ("for", "من أجل"),
    ("not", "لا"),
    ("no", "لا"),
    // temporal adverbs
    ("today", "اليوم"),
    ("yesterday", "أمس"),
    ("tomorrow", "غدا"),
    ("now", "الآن"),
    ("daily", "يوميا"),
    ("always", "دائما"),
    ("sometimes", "أحيانا"),
    ("never", "أبدا"),
    ("before", "قبل"),
    ("after", "بعد"),
    ("during", "خلال"),
    ("ago", "منذ"),
];

/// Structural Arabic grammar rules.
pub const STRUCTURAL_RULES: &[PatternRow] = &[
    (r"(^|\s)(?:ال\s+)+(ال\p{Arabic})", "${1}${2}", "drop duplicated article"),
    (r"(^|\s)ال\s+(\p{Arabic})", "${1}ال${2}", "attach article"),
    (r"(^|\s)و\s+(\p{Arabic})", "${1}و${2}", "attach conjunction"),
    (r"(^|\s)في(?:\s+في)+(\s|$)", "${1}في${2}", "duplicate preposition في"),
    (r"(^|\s)من(?:\s+من)+(\s|$)", "${1}من${2}", "duplicate preposition من"),
    (r"(^|\s)إلى(?:\s+إلى)+(\s|$)", "${1}إلى${2}", "duplicate preposition إلى"),
    (r"(^|\s)على(?:\s+على)+(\s|$)", "${1}على${2}", "duplicate preposition على"),
    (r"(^|\s)مع(?:\s+مع)+(\s|$)", "${1}مع${2}", "duplicate preposition مع"),
    (r"(^|\s)عن(?:\s+عن)+(\s|$)", "${1}عن${2}", "duplicate preposition عن"),
    (r"\bهاذا\b", "هذا", "demonstrative هذا"),
    (r"\bهاذه\b", "هذه", "demonstrative هذه"),
    (r"\bهاذان\b", "هذان", "demonstrative هذان"),
    (r"\bذالك\b", "ذلك", "demonstrative ذلك"),
    (r"\bهاؤلاء\b", "هؤلاء", "demonstrative هؤلاء"),
    (r"\bاللذي\b", "الذي", "relative pronoun الذي"),
    (r"\bاللتي\b", "التي", "relative pronoun التي"),
    (r"\bاللذين\b", "الذين", "relative pronoun الذين"),
    (r"\bالمريضة\s+يعاني\b", "المريضة تعاني", "feminine agreement تعاني"),
    (r"\bالمريضة\s+يشكو\b", "المريضة تشكو", "feminine agreement تشكو"),
    (r"\bهي\s+يعاني\b", "هي تعاني", "feminine pronoun agreement"),
    (r"\bالمريضة\s+مصاب\b", "المريضة مصابة", "feminine adjective مصابة"),
    (r"\bالحالة\s+مستقر\b", "الحالة مستقرة", "feminine adjective مستقرة"),
    (r"\bالحالة\s+طبيعي\b", "الحالة طبيعية", "feminine adjective طبيعية"),
];

/// Frequent misspellings mapped to their corrected forms.
pub const COMMON_MISTAKES: &[PhraseRow] = &[
    ("انشاء الله", "إن شاء الله"),
    ("الى", "إلى"),
    ("مسؤل", "مسؤول"),
    ("لاكن", "لكن"),
    ("مستشفي", "مستشفى"),
    ("الادويه", "الأدوية"),
    ("الادوية", "الأدوية"),
    ("الاعراض", "الأعراض"),
    ("امراض", "أمراض"),
    ("الضغت", "الضغط"),
    ("الطبيه", "الطبية"),
    ("ايضا", "أيضا"),
    ("اذا", "إذا"),
    ("هاذي", "هذه"),
];
