//! Built-in dataset schemas and the dataset catalog.

use super::{Category, CategorySchema};
use crate::error::{StatsError, StatsResult};
use crate::geo::GeographyKind;
use tracing::debug;

/// Destination countries of the all-countries table, by continent.
const ALL_COUNTRIES: &[(&str, &[&str])] = &[
    (
        "Americas",
        &[
            "ARGENTINA", "BAHAMAS", "BARBADOS", "BELIZE", "BOLIVIA (PLURINATIONAL STATE OF)",
            "BRAZIL", "CANADA", "CHILE", "COLOMBIA", "COSTA RICA", "DOMINICAN REPUBLIC",
            "ECUADOR", "EL SALVADOR", "GUATEMALA", "HONDURAS", "JAMAICA", "MEXICO", "NICARAGUA",
            "PANAMA", "PARAGUAY", "PERU", "UNITED STATES OF AMERICA", "URUGUAY",
            "VENEZUELA (BOLIVARIAN REPUBLIC OF)",
        ],
    ),
    (
        "Europe",
        &[
            "ALBANIA", "ARMENIA", "AUSTRIA", "AZERBAIJAN", "BELARUS", "BELGIUM",
            "BOSNIA AND HERZEGOVINA", "BULGARIA", "CROATIA", "CYPRUS", "CZECHIA", "DENMARK",
            "ESTONIA", "FINLAND", "FRANCE", "GEORGIA", "GERMANY", "GREECE", "HUNGARY",
            "ICELAND", "IRELAND", "ITALY", "LATVIA", "LITHUANIA", "LUXEMBOURG",
            "MACEDONIA (THE FORMER YUGOSLAV REPUBLIC OF)", "MALTA", "MOLDOVA", "MONACO",
            "MONTENEGRO", "NETHERLANDS", "NORWAY", "POLAND", "PORTUGAL", "ROMANIA",
            "RUSSIAN FEDERATION", "SERBIA", "SLOVAKIA", "SLOVENIA", "SPAIN", "SWEDEN",
            "SWITZERLAND", "TURKEY", "UKRAINE", "UNITED KINGDOM",
        ],
    ),
    (
        "Asia & Middle East",
        &[
            "BAHRAIN", "BANGLADESH", "BHUTAN", "CAMBODIA", "CHINA", "INDIA", "INDONESIA",
            "IRAN (ISLAMIC REPUBLIC OF)", "IRAQ", "ISRAEL", "JAPAN", "JORDAN", "KAZAKHSTAN",
            "KUWAIT", "KYRGYZSTAN", "LEBANON", "MALAYSIA", "MALDIVES", "MYANMAR", "OMAN",
            "PAKISTAN", "QATAR", "REPUBLIC OF KOREA", "SAUDI ARABIA", "SINGAPORE", "SRI LANKA",
            "TAJIKISTAN", "THAILAND", "UNITED ARAB EMIRATES", "UZBEKISTAN", "VIET NAM", "YEMEN",
        ],
    ),
    (
        "Africa",
        &[
            "ANGOLA", "BENIN", "BOTSWANA", "CONGO", "EGYPT", "KENYA", "LIBERIA", "MALI",
            "MAURITANIA", "MAURITIUS", "MOROCCO", "NAMIBIA", "SOUTH AFRICA", "UGANDA", "ZAMBIA",
            "ZIMBABWE",
        ],
    ),
    (
        "Oceania",
        &["AUSTRALIA", "FIJI", "KIRIBATI", "NEW ZEALAND"],
    ),
];

fn civil_status() -> StatsResult<CategorySchema> {
    CategorySchema::new(
        "civil-status",
        "civilStatus",
        vec![
            Category::new("single", "Single"),
            Category::new("married", "Married"),
            Category::new("widower", "Widower"),
            Category::new("separated", "Separated"),
            Category::new("divorced", "Divorced"),
            Category::new("notReported", "Not Reported").with_aliases(&[
                "notreported",
                "not Reported",
                "not_reported",
            ]),
        ],
    )
}

fn sex() -> StatsResult<CategorySchema> {
    CategorySchema::new(
        "sex",
        "sex",
        vec![Category::new("male", "Male"), Category::new("female", "Female")],
    )
}

fn education() -> StatsResult<CategorySchema> {
    CategorySchema::new(
        "education",
        "education",
        vec![
            Category::new("notOfSchoolingAge", "Not of Schooling Age"),
            Category::new("noFormalEducation", "No Formal Education"),
            Category::new("elementaryLevel", "Elementary Level"),
            Category::new("elementaryGraduate", "Elementary Graduate"),
            Category::new("highSchoolLevel", "High School Level"),
            Category::new("highSchoolGraduate", "High School Graduate"),
            Category::new("vocationalLevel", "Vocational Level"),
            Category::new("vocationalGraduate", "Vocational Graduate"),
            Category::new("collegeLevel", "College Level"),
            Category::new("collegeGraduate", "College Graduate"),
            Category::new("postGraduateLevel", "Post Graduate Level"),
            Category::new("postGraduate", "Post Graduate"),
            Category::new("nonFormalEducation", "Non-Formal Education"),
            Category::new("notReported", "Not Reported").with_aliases(&["notreported"]),
        ],
    )
}

fn occupation() -> StatsResult<CategorySchema> {
    CategorySchema::new(
        "occupation",
        "occupation",
        vec![
            Category::new("profTechRelated", "Prof'l, Tech'l, & Related Workers"),
            Category::new("managerial", "Managerial"),
            Category::new("clerical", "Clerical"),
            Category::new("sales", "Sales"),
            Category::new("service", "Service"),
            Category::new("agriculture", "Agriculture"),
            Category::new("production", "Production"),
            Category::new("armedForces", "Armed Forces"),
            Category::new("housewives", "Housewives"),
            Category::new("retirees", "Retirees"),
            Category::new("students", "Students"),
            Category::new("minors", "Minors"),
            Category::new("outOfSchoolYouth", "Out of School Youth"),
            Category::new("noOccupationReported", "No Occupation Reported"),
        ],
    )
}

fn age() -> StatsResult<CategorySchema> {
    CategorySchema::new(
        "age",
        "age_data",
        vec![
            Category::new("14below", "Below 14").with_aliases(&["14 - Below", "14 Below"]),
            Category::new("1519", "15-19").with_aliases(&["15 - 19"]),
            Category::new("2024", "20-24").with_aliases(&["20 - 24"]),
            Category::new("2529", "25-29").with_aliases(&["25 - 29"]),
            Category::new("3034", "30-34").with_aliases(&["30 - 34"]),
            Category::new("3539", "35-39").with_aliases(&["35 - 39"]),
            Category::new("4044", "40-44").with_aliases(&["40 - 44"]),
            Category::new("4549", "45-49").with_aliases(&["45 - 49"]),
            Category::new("5054", "50-54").with_aliases(&["50 - 54"]),
            Category::new("5559", "55-59").with_aliases(&["55 - 59"]),
            Category::new("6064", "60-64").with_aliases(&["60 - 64"]),
            Category::new("6569", "65-69").with_aliases(&["65 - 69"]),
            Category::new("70Above", "70+").with_aliases(&["70 - Above", "70 Above"]),
            Category::new("notReported", "Not Reported").with_aliases(&["notreported"]),
        ],
    )
}

fn place_of_origin() -> StatsResult<CategorySchema> {
    Ok(CategorySchema::new(
        "place-of-origin",
        "place_of_origin",
        vec![
            Category::new("regioni", "Region I - Ilocos Region").with_aliases(&["regionI"]),
            Category::new("regionii", "Region II - Cagayan Valley").with_aliases(&["regionII"]),
            Category::new("regioniii", "Region III - Central Luzon")
                .with_aliases(&["regionIII"]),
            Category::new("regioniva", "Region IV-A - CALABARZON").with_aliases(&["regionIVA"]),
            Category::new("regionivb", "Region IV-B - MIMAROPA").with_aliases(&["regionIVB"]),
            Category::new("regionv", "Region V - Bicol Region").with_aliases(&["regionV"]),
            Category::new("regionvi", "Region VI - Western Visayas").with_aliases(&["regionVI"]),
            Category::new("regionvii", "Region VII - Central Visayas")
                .with_aliases(&["regionVII"]),
            Category::new("regionviii", "Region VIII - Eastern Visayas")
                .with_aliases(&["regionVIII"]),
            Category::new("regionix", "Region IX - Zamboanga Peninsula")
                .with_aliases(&["regionIX"]),
            Category::new("regionx", "Region X - Northern Mindanao").with_aliases(&["regionX"]),
            Category::new("regionxi", "Region XI - Davao Region").with_aliases(&["regionXI"]),
            Category::new("regionxii", "Region XII - SOCCSKSARGEN").with_aliases(&["regionXII"]),
            Category::new("regionxiii", "Region XIII - Caraga").with_aliases(&["regionXIII"]),
            Category::new("armm", "ARMM").with_aliases(&["ARMM", "barmm", "BARMM"]),
            Category::new("car", "CAR").with_aliases(&["CAR"]),
            Category::new("ncr", "NCR").with_aliases(&["NCR"]),
            Category::new("notReported", "Not Reported").with_aliases(&["notreported"]),
        ],
    )?
    .with_geography(GeographyKind::PhilippineRegions))
}

fn major_countries() -> StatsResult<CategorySchema> {
    let country = |key: &str, label: &str, alias: &str| {
        Category::new(key, label).with_aliases(&[alias])
    };

    Ok(CategorySchema::new(
        "major-countries",
        "majorCountries",
        vec![
            country("USA", "USA", "usa"),
            country("CANADA", "Canada", "canada"),
            country("JAPAN", "Japan", "japan"),
            country("AUSTRALIA", "Australia", "australia"),
            country("ITALY", "Italy", "italy"),
            country("NEW ZEALAND", "New Zealand", "newZealand"),
            country("UNITED KINGDOM", "United Kingdom", "unitedKingdom"),
            country("GERMANY", "Germany", "germany"),
            country("SOUTH KOREA", "South Korea", "southKorea"),
            country("SPAIN", "Spain", "spain"),
            country("OTHERS", "Others", "others"),
        ],
    )?
    .with_geography(GeographyKind::Countries))
}

fn all_countries() -> StatsResult<CategorySchema> {
    let categories = ALL_COUNTRIES
        .iter()
        .flat_map(|(continent, countries)| {
            countries.iter().map(move |name| {
                Category::new(name, name)
                    .with_aliases(&[name.to_lowercase().as_str()])
                    .in_group(continent)
            })
        })
        .collect();

    Ok(CategorySchema::new("all-countries", "allCountries", categories)?
        .wide()
        .with_geography(GeographyKind::Countries))
}

/// Yearly emigrant population, one number per year.
///
/// Read from a spreadsheet with `--file` for the historical trend chart.
fn emigrant_population() -> StatsResult<CategorySchema> {
    CategorySchema::new(
        "emigrant-population",
        "emigrantPopulation",
        vec![Category::new("emigrants", "Emigrants").with_aliases(&["Emigrants"])],
    )
}

/// Every dataset shape of the emigration dashboards.
pub fn builtin_schemas() -> StatsResult<Vec<CategorySchema>> {
    Ok(vec![
        civil_status()?,
        sex()?,
        education()?,
        occupation()?,
        age()?,
        place_of_origin()?,
        major_countries()?,
        all_countries()?,
        emigrant_population()?,
    ])
}

/// Named lookup over built-in and configured schemas.
#[derive(Debug, Clone)]
pub struct Catalog {
    schemas: Vec<CategorySchema>,
}

impl Catalog {
    /// Catalog of the built-in datasets.
    pub fn builtin() -> StatsResult<Self> {
        Ok(Self {
            schemas: builtin_schemas()?,
        })
    }

    /// Add configured schemas. A schema with an existing name replaces it.
    pub fn extend(&mut self, extra: &[CategorySchema]) -> StatsResult<()> {
        for schema in extra {
            schema.validate()?;
            match self.schemas.iter_mut().find(|s| s.name == schema.name) {
                Some(existing) => {
                    debug!("Configured dataset '{}' replaces built-in", schema.name);
                    *existing = schema.clone();
                }
                None => self.schemas.push(schema.clone()),
            }
        }
        Ok(())
    }

    /// Find a dataset by name or collection, ignoring case.
    pub fn get(&self, name: &str) -> StatsResult<&CategorySchema> {
        self.schemas
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name) || s.collection.eq_ignore_ascii_case(name))
            .ok_or_else(|| StatsError::UnknownDataset(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategorySchema> {
        self.schemas.iter()
    }
}
