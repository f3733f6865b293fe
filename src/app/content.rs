//! Static page copy in both languages

use crate::core::Language;

/// A string with an Italian and an English variant
#[derive(Clone, Copy, Debug)]
pub struct Text {
    pub it: &'static str,
    pub en: &'static str,
}

pub const fn bi(it: &'static str, en: &'static str) -> Text {
    Text { it, en }
}

/// Same string in both languages
pub const fn same(s: &'static str) -> Text {
    Text { it: s, en: s }
}

impl Text {
    pub fn get(&self, language: Language) -> &'static str {
        match language {
            Language::It => self.it,
            Language::En => self.en,
        }
    }
}

pub const OWNER: &str = "Simone Torrengo";
pub const GITHUB_URL: &str = "https://github.com/SIMONE010afk";
pub const LINKEDIN_URL: &str = "https://www.linkedin.com/in/simone-torrengo";

pub mod nav {
    use super::*;

    pub const HOME: Text = same("Home");
    pub const PROJECTS: Text = bi("Progetti", "Projects");
    pub const SKILLS: Text = bi("Competenze", "Skills");
    pub const CONTACT: Text = bi("Contatti", "Contact");
}

pub mod hero {
    use super::*;

    pub const ROLE: Text = bi("Data Analyst & AI Specialist", "Data Analyst & AI Specialist");
    pub const BLURB: Text = bi(
        "Data analyst e AI specialist con background matematico e sportivo.",
        "Data analyst and AI specialist with a mathematical and sports background.",
    );
    pub const CTA: Text = bi("Vedi i progetti", "See projects");
}

pub mod projects {
    use super::*;

    pub const BADGE: Text = same("Portfolio");
    pub const TITLE: Text = bi("Progetti", "Projects");
    pub const SUBTITLE: Text = bi(
        "Progetti sviluppati tra machine learning, data engineering e Agenti AI.",
        "Projects developed across machine learning, data engineering and AI Agents.",
    );
    pub const CODE: Text = same("Code");
}

pub struct Project {
    pub key: &'static str,
    pub title: Text,
    pub description: Text,
    pub tags: &'static [&'static str],
    pub github: Option<&'static str>,
}

pub const PROJECTS: &[Project] = &[
    Project {
        key: "hateful-memes",
        title: bi(
            "Facebook Hateful Memes - Rilevamento Multimodale",
            "Facebook Hateful Memes - Multimodal Detection",
        ),
        description: bi(
            "Classificazione multimodale di meme offensivi con pipeline text + image e confronto tra modelli unimodali e fusion.",
            "Multimodal classification of hateful memes using a text + image pipeline and comparison against unimodal baselines.",
        ),
        tags: &["TensorFlow", "NLP", "Computer Vision", "Google Colab"],
        github: Some("https://github.com/SIMONE010afk/Facebook-Hateful-Memes"),
    },
    Project {
        key: "olympics-2016",
        title: bi(
            "Olimpiadi 2016 - Predizione Podio Nuoto",
            "Olympics 2016 - Swimming Podium Prediction",
        ),
        description: bi(
            "Pipeline dati + modelli ranking per stimare qualificazioni e podio nel nuoto olimpico usando storico gare 2000-2016.",
            "Data pipeline and ranking models to estimate qualifications and podium outcomes in Olympic swimming using 2000-2016 history.",
        ),
        tags: &["Python", "XGBoost", "Scikit-learn", "Feature Engineering"],
        github: Some("https://github.com/SIMONE010afk/Olimpic-Games"),
    },
    Project {
        key: "swim-data",
        title: bi("Data Engineering Risultati Nuoto", "Swimming Results Data Engineering"),
        description: bi(
            "Parsing e unificazione di dataset eterogenei (Olimpiadi, Mondiali, Pro Series) in schema coerente per training e analisi.",
            "Parsing and unification of heterogeneous datasets (Olympics, Worlds, Pro Series) into a consistent schema for training and analysis.",
        ),
        tags: &["ETL", "CSV Parsing", "Data Quality", "Python"],
        github: None,
    },
];

pub mod skills {
    use super::*;

    pub const BADGE: Text = bi("Competenze", "Expertise");
    pub const TITLE: Text = bi("Competenze Tecniche", "Technical Skills");
    pub const SUBTITLE: Text = bi(
        "Competenze costruite su percorsi in data analysis, machine learning, deep learning e agenti AI.",
        "Skills built through data analysis, machine learning, deep learning and AI agent projects.",
    );
}

pub struct Skill {
    pub name: &'static str,
    pub level: u8,
    pub category: &'static str,
}

const fn skill(name: &'static str, level: u8, category: &'static str) -> Skill {
    Skill { name, level, category }
}

pub const SKILLS: &[Skill] = &[
    skill("Python", 100, "Languages"),
    skill("JavaScript", 60, "Languages"),
    skill("TypeScript", 70, "Languages"),
    skill("SQL", 90, "Languages"),
    skill("C", 70, "Languages"),
    skill("Rust", 40, "Languages"),
    skill("R", 55, "Languages"),
    skill("TensorFlow / Keras", 82, "ML/AI"),
    skill("PyTorch", 72, "ML/AI"),
    skill("Scikit-learn", 90, "ML/AI"),
    skill("XGBoost", 83, "ML/AI"),
    skill("NLP", 78, "AI"),
    skill("Computer Vision", 74, "AI"),
    skill("RAG", 80, "AI"),
    skill("Power BI", 76, "Analytics"),
    skill("Tableau", 60, "Analytics"),
    skill("Feature Engineering", 87, "Data Engineering"),
    skill("Data Wrangling", 90, "Data Engineering"),
    skill("Data Warehousing", 75, "Data Engineering"),
    skill("Apache Airflow", 80, "Orchestration"),
    skill("API Integration", 70, "Dev"),
    skill("Cloud Deployment", 80, "DevOps"),
    skill("Docker", 58, "DevOps"),
    skill("Cloud Basics", 55, "DevOps"),
    skill("PostgreSQL", 70, "Database"),
    skill("BigQuery", 90, "Database"),
    skill("Google Cloud Storage", 84, "Database"),
    skill("Git", 100, "Tools"),
    skill("Git / GitHub", 86, "Tools"),
    skill("Google Colab", 95, "Tools"),
];

/// Skill filter: everything, or one category
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Category {
    #[default]
    All,
    Only(&'static str),
}

impl Category {
    pub fn matches(&self, skill: &Skill) -> bool {
        match self {
            Category::All => true,
            Category::Only(name) => skill.category == *name,
        }
    }

    pub fn label(&self, language: Language) -> &'static str {
        let name = match self {
            Category::All => "All",
            Category::Only(name) => *name,
        };
        if language == Language::En {
            return name;
        }
        match name {
            "All" => "Tutti",
            "Languages" => "Linguaggi",
            "Tools" => "Strumenti",
            other => other,
        }
    }
}

/// "All" followed by each category in first-appearance order
pub fn categories() -> Vec<Category> {
    let mut out = vec![Category::All];
    for skill in SKILLS {
        let category = Category::Only(skill.category);
        if !out.contains(&category) {
            out.push(category);
        }
    }
    out
}

pub fn filtered(category: Category) -> impl Iterator<Item = &'static Skill> {
    SKILLS.iter().filter(move |s| category.matches(s))
}

pub mod contact {
    use super::*;

    pub const BADGE: Text = bi("Contatti", "Contact");
    pub const TITLE: Text = bi("Lavoriamo insieme", "Let's work together");
    pub const BODY: Text = bi(
        "Aperto a collaborazioni su progetti di data analysis, machine learning e agenti AI.",
        "Open to collaborations on data analysis, machine learning and AI agent projects.",
    );
}

pub mod footer {
    use super::*;

    pub const LANGUAGE: Text = bi("Lingua", "Language");
    pub const BACK_TO_TOP: Text = bi("Torna su", "Back to top");
    pub const NAVIGATION: Text = bi("Navigazione", "Navigation");
    pub const FOCUS: Text = same("Focus");
    pub const NETWORKS: Text = bi("Reti", "Networks");
    pub const FOCUS_ITEMS: &[Text] = &[
        same("Machine Learning"),
        same("Data Engineering"),
        bi("Agenti AI", "AI Agents"),
        same("NLP & Vision"),
    ];
    pub const RIGHTS: Text = bi("Tutti i diritti riservati.", "All rights reserved.");
    pub const MADE_IN: Text = bi("Fatto con \u{2665} a Torino", "Made with \u{2665} in Turin");
}
