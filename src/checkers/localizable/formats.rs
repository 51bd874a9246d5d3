//! Per-locale date, time and number conventions.
//!
//! Date and time patterns use the usual letters: `y` year, `M` month
//! (`MMM`+ for names), `d` day, `E` weekday, `H`/`h` hour (24h/12h), `m`
//! minute, `s` second, `a` am/pm marker, `z` time zone, `'...'` literal.

pub struct LocaleFormats {
    /// Full, long, medium and short date patterns.
    pub dates: [&'static str; 4],
    /// Full, long, medium and short time patterns.
    pub times: [&'static str; 4],
    pub months: [&'static str; 12],
    pub short_months: [&'static str; 12],
    pub weekdays: [&'static str; 7],
    pub short_weekdays: [&'static str; 7],
    pub am_pm: [&'static str; 2],
    pub decimal_separator: char,
    pub grouping_separators: &'static [char],
}

const ENGLISH_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];
const ENGLISH_SHORT_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const ENGLISH_WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];
const ENGLISH_SHORT_WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const TIMES_24H: [&str; 4] = ["HH:mm:ss zzzz", "HH:mm:ss z", "HH:mm:ss", "HH:mm"];

pub static EN_US: LocaleFormats = LocaleFormats {
    dates: ["EEEE, MMMM d, y", "MMMM d, y", "MMM d, y", "M/d/yy"],
    times: ["h:mm:ss a zzzz", "h:mm:ss a z", "h:mm:ss a", "h:mm a"],
    months: ENGLISH_MONTHS,
    short_months: ENGLISH_SHORT_MONTHS,
    weekdays: ENGLISH_WEEKDAYS,
    short_weekdays: ENGLISH_SHORT_WEEKDAYS,
    am_pm: ["AM", "PM"],
    decimal_separator: '.',
    grouping_separators: &[','],
};

pub static EN_GB: LocaleFormats = LocaleFormats {
    dates: ["EEEE, d MMMM y", "d MMMM y", "d MMM y", "dd/MM/y"],
    times: TIMES_24H,
    months: ENGLISH_MONTHS,
    short_months: ENGLISH_SHORT_MONTHS,
    weekdays: ENGLISH_WEEKDAYS,
    short_weekdays: ENGLISH_SHORT_WEEKDAYS,
    am_pm: ["am", "pm"],
    decimal_separator: '.',
    grouping_separators: &[','],
};

pub static FR: LocaleFormats = LocaleFormats {
    dates: ["EEEE d MMMM y", "d MMMM y", "d MMM y", "dd/MM/y"],
    times: TIMES_24H,
    months: [
        "janvier",
        "février",
        "mars",
        "avril",
        "mai",
        "juin",
        "juillet",
        "août",
        "septembre",
        "octobre",
        "novembre",
        "décembre",
    ],
    short_months: [
        "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
        "déc.",
    ],
    weekdays: [
        "dimanche", "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi",
    ],
    short_weekdays: ["dim.", "lun.", "mar.", "mer.", "jeu.", "ven.", "sam."],
    am_pm: ["AM", "PM"],
    decimal_separator: ',',
    grouping_separators: &['\u{202F}', '\u{00A0}'],
};

pub static DE: LocaleFormats = LocaleFormats {
    dates: ["EEEE, d. MMMM y", "d. MMMM y", "dd.MM.y", "dd.MM.yy"],
    times: TIMES_24H,
    months: [
        "Januar",
        "Februar",
        "März",
        "April",
        "Mai",
        "Juni",
        "Juli",
        "August",
        "September",
        "Oktober",
        "November",
        "Dezember",
    ],
    short_months: [
        "Jan.", "Feb.", "März", "Apr.", "Mai", "Juni", "Juli", "Aug.", "Sept.", "Okt.", "Nov.",
        "Dez.",
    ],
    weekdays: [
        "Sonntag",
        "Montag",
        "Dienstag",
        "Mittwoch",
        "Donnerstag",
        "Freitag",
        "Samstag",
    ],
    short_weekdays: ["So.", "Mo.", "Di.", "Mi.", "Do.", "Fr.", "Sa."],
    am_pm: ["AM", "PM"],
    decimal_separator: ',',
    grouping_separators: &['.'],
};

pub static ES: LocaleFormats = LocaleFormats {
    dates: [
        "EEEE, d 'de' MMMM 'de' y",
        "d 'de' MMMM 'de' y",
        "d MMM y",
        "d/M/yy",
    ],
    times: ["H:mm:ss zzzz", "H:mm:ss z", "H:mm:ss", "H:mm"],
    months: [
        "enero",
        "febrero",
        "marzo",
        "abril",
        "mayo",
        "junio",
        "julio",
        "agosto",
        "septiembre",
        "octubre",
        "noviembre",
        "diciembre",
    ],
    short_months: [
        "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
    ],
    weekdays: [
        "domingo",
        "lunes",
        "martes",
        "miércoles",
        "jueves",
        "viernes",
        "sábado",
    ],
    short_weekdays: ["dom", "lun", "mar", "mié", "jue", "vie", "sáb"],
    am_pm: ["a. m.", "p. m."],
    decimal_separator: ',',
    grouping_separators: &['.'],
};

pub static IT: LocaleFormats = LocaleFormats {
    dates: ["EEEE d MMMM y", "d MMMM y", "d MMM y", "dd/MM/yy"],
    times: TIMES_24H,
    months: [
        "gennaio",
        "febbraio",
        "marzo",
        "aprile",
        "maggio",
        "giugno",
        "luglio",
        "agosto",
        "settembre",
        "ottobre",
        "novembre",
        "dicembre",
    ],
    short_months: [
        "gen", "feb", "mar", "apr", "mag", "giu", "lug", "ago", "set", "ott", "nov", "dic",
    ],
    weekdays: [
        "domenica",
        "lunedì",
        "martedì",
        "mercoledì",
        "giovedì",
        "venerdì",
        "sabato",
    ],
    short_weekdays: ["dom", "lun", "mar", "mer", "gio", "ven", "sab"],
    am_pm: ["AM", "PM"],
    decimal_separator: ',',
    grouping_separators: &['.'],
};

pub static PT: LocaleFormats = LocaleFormats {
    dates: [
        "EEEE, d 'de' MMMM 'de' y",
        "d 'de' MMMM 'de' y",
        "d 'de' MMM 'de' y",
        "dd/MM/y",
    ],
    times: TIMES_24H,
    months: [
        "janeiro",
        "fevereiro",
        "março",
        "abril",
        "maio",
        "junho",
        "julho",
        "agosto",
        "setembro",
        "outubro",
        "novembro",
        "dezembro",
    ],
    short_months: [
        "jan.", "fev.", "mar.", "abr.", "mai.", "jun.", "jul.", "ago.", "set.", "out.", "nov.",
        "dez.",
    ],
    weekdays: [
        "domingo",
        "segunda-feira",
        "terça-feira",
        "quarta-feira",
        "quinta-feira",
        "sexta-feira",
        "sábado",
    ],
    short_weekdays: ["dom.", "seg.", "ter.", "qua.", "qui.", "sex.", "sáb."],
    am_pm: ["AM", "PM"],
    decimal_separator: ',',
    grouping_separators: &['.'],
};

pub static JA: LocaleFormats = LocaleFormats {
    dates: ["y年M月d日EEEE", "y年M月d日", "y/MM/dd", "y/MM/dd"],
    times: ["H時mm分ss秒 zzzz", "H:mm:ss z", "H:mm:ss", "H:mm"],
    months: [
        "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月", "12月",
    ],
    short_months: [
        "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月", "12月",
    ],
    weekdays: [
        "日曜日", "月曜日", "火曜日", "水曜日", "木曜日", "金曜日", "土曜日",
    ],
    short_weekdays: ["日", "月", "火", "水", "木", "金", "土"],
    am_pm: ["午前", "午後"],
    decimal_separator: '.',
    grouping_separators: &[','],
};

/// ISO 8601 conventions for locales without a dedicated table.
pub static ISO: LocaleFormats = LocaleFormats {
    dates: ["y-MM-dd", "y-MM-dd", "y-MM-dd", "y-MM-dd"],
    times: ["HH:mm:ss", "HH:mm:ss", "HH:mm:ss", "HH:mm"],
    months: ENGLISH_MONTHS,
    short_months: ENGLISH_SHORT_MONTHS,
    weekdays: ENGLISH_WEEKDAYS,
    short_weekdays: ENGLISH_SHORT_WEEKDAYS,
    am_pm: ["AM", "PM"],
    decimal_separator: '.',
    grouping_separators: &[','],
};

pub fn for_locale(locale: &crate::locale::LocaleId) -> &'static LocaleFormats {
    match (locale.language(), locale.region()) {
        ("en", Some("gb" | "au" | "nz" | "ie" | "in")) => &EN_GB,
        ("en", _) => &EN_US,
        ("fr", _) => &FR,
        ("de", _) => &DE,
        ("es", _) => &ES,
        ("it", _) => &IT,
        ("pt", _) => &PT,
        ("ja", _) => &JA,
        _ => &ISO,
    }
}
