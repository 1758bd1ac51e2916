//! Prompt builder
//!
//! Turns a validated company profile into the single instruction string sent
//! to the completion endpoint. Pure string assembly, no I/O.

use std::fmt::Write as _;

use super::profile::CompanyProfile;

/// Placeholder for optional fields the submitter left blank
pub const NOT_AVAILABLE: &str = "N/A";

/// Language the advice should be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    Chinese,
    Japanese,
    Korean,
    Spanish,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::English,
        Language::Chinese,
        Language::Japanese,
        Language::Korean,
        Language::Spanish,
    ];

    /// Resolve a language tag, falling back to English for anything unknown.
    ///
    /// Matching is case-insensitive on the primary subtag, so `zh-CN` and
    /// `ZH` both select Chinese.
    pub fn from_code(code: &str) -> Self {
        let primary = code
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match primary.as_str() {
            "zh" => Language::Chinese,
            "ja" => Language::Japanese,
            "ko" => Language::Korean,
            "es" => Language::Spanish,
            _ => Language::English,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Chinese => "zh",
            Language::Japanese => "ja",
            Language::Korean => "ko",
            Language::Spanish => "es",
        }
    }

    /// Instruction line that opens the prompt
    pub fn instruction(&self) -> &'static str {
        match self {
            Language::English => "Please provide the following recommendations in English:",
            Language::Chinese => "请用中文提供以下建议：",
            Language::Japanese => "以下のアドバイスを日本語で提供してください：",
            Language::Korean => "다음 권장 사항을 한국어로 제공해 주세요:",
            Language::Spanish => {
                "Por favor, proporcione las siguientes recomendaciones en español:"
            }
        }
    }
}

/// Advice categories requested from the model, each with its focus points
const ADVICE_CATEGORIES: [(&str, [&str; 3]); 5] = [
    (
        "Growth strategy",
        [
            "Market expansion opportunities",
            "Product/service development",
            "Customer acquisition strategies",
        ],
    ),
    (
        "Resource allocation",
        ["Budget optimization", "Team development", "Technology investments"],
    ),
    (
        "Market positioning",
        [
            "Competitive advantage",
            "Brand development",
            "Customer value proposition",
        ],
    ),
    (
        "Risk management",
        ["Market risks", "Operational risks", "Financial risks"],
    ),
    (
        "Sustainability initiatives",
        [
            "Environmental impact",
            "Social responsibility",
            "Long-term viability",
        ],
    ),
];

/// Build the prompt for one advice request
pub fn build_prompt(profile: &CompanyProfile, language: Language) -> String {
    let mut prompt = String::with_capacity(2048);

    // Writing into a String cannot fail
    let _ = write!(
        prompt,
        "{instruction}

Company characteristics:
Basic Information:
- Industry Group: {gics}
- Company Name: {name}
- Years in Business: {years}
- Location: {location}

Financial & Scale:
- Team Size: {team} employees
- Available Capital: ${capital}
- Annual Revenue: {revenue}
- Current Client Base: {clients} clients

Market Position:
- Main Products/Services: {products}
- Target Market: {market}
- Key Competitors: {competitors}

Impact & Culture:
- Social Impact Score: {impact}/10
- Company Values: {values}
- Current Challenges: {challenges}
- Future Goals: {goals}

Additional Context:
{additional}

Please provide comprehensive recommendations for:
",
        instruction = language.instruction(),
        gics = profile.gics_group,
        name = or_na(&profile.company_name),
        years = or_na(&profile.years_in_business),
        location = or_na(&profile.location),
        team = profile.team_size,
        capital = profile.capital,
        revenue = profile
            .annual_revenue
            .as_deref()
            .map(|r| format!("${}", r))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        clients = profile.num_clients,
        products = or_na(&profile.products),
        market = or_na(&profile.target_market),
        competitors = or_na(&profile.competitors),
        impact = profile.social_impact,
        values = or_na(&profile.values),
        challenges = or_na(&profile.challenges),
        goals = or_na(&profile.goals),
        additional = or_na(&profile.additional_info),
    );

    for (index, (category, points)) in ADVICE_CATEGORIES.iter().enumerate() {
        if index > 0 {
            prompt.push('\n');
        }
        let _ = writeln!(prompt, "{}. {}", index + 1, category);
        for point in points {
            let _ = writeln!(prompt, "   - {}", point);
        }
    }

    prompt
}

fn or_na(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(NOT_AVAILABLE)
}
