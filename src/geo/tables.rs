//! Static geography alias tables.
//!
//! Each entry pairs an internal category key with one external geography
//! name. The first entry for a key is its primary display name.

/// Philippine administrative regions as named by common GeoJSON sources.
pub const PHILIPPINE_REGIONS: &[(&str, &str)] = &[
    ("ncr", "National Capital Region (NCR)"),
    ("ncr", "National Capital Region"),
    ("ncr", "NCR"),
    ("car", "Cordillera Administrative Region (CAR)"),
    ("car", "Cordillera Administrative Region"),
    ("car", "CAR"),
    ("regioni", "Ilocos Region (Region I)"),
    ("regioni", "Ilocos Region"),
    ("regioni", "Region I"),
    ("regionii", "Cagayan Valley (Region II)"),
    ("regionii", "Cagayan Valley"),
    ("regionii", "Region II"),
    ("regioniii", "Central Luzon (Region III)"),
    ("regioniii", "Central Luzon"),
    ("regioniii", "Region III"),
    ("regioniva", "CALABARZON (Region IV-A)"),
    ("regioniva", "CALABARZON"),
    ("regioniva", "Region IV-A"),
    ("regionivb", "MIMAROPA (Region IV-B)"),
    ("regionivb", "MIMAROPA Region"),
    ("regionivb", "Region IV-B"),
    ("regionv", "Bicol Region (Region V)"),
    ("regionv", "Bicol Region"),
    ("regionv", "Region V"),
    ("regionvi", "Western Visayas (Region VI)"),
    ("regionvi", "Western Visayas"),
    ("regionvi", "Region VI"),
    ("regionvii", "Central Visayas (Region VII)"),
    ("regionvii", "Central Visayas"),
    ("regionvii", "Region VII"),
    ("regionviii", "Eastern Visayas (Region VIII)"),
    ("regionviii", "Eastern Visayas"),
    ("regionviii", "Region VIII"),
    ("regionix", "Zamboanga Peninsula (Region IX)"),
    ("regionix", "Zamboanga Peninsula"),
    ("regionix", "Region IX"),
    ("regionx", "Northern Mindanao (Region X)"),
    ("regionx", "Northern Mindanao"),
    ("regionx", "Region X"),
    ("regionxi", "Davao Region (Region XI)"),
    ("regionxi", "Davao Region"),
    ("regionxi", "Region XI"),
    ("regionxii", "SOCCSKSARGEN (Region XII)"),
    ("regionxii", "SOCCSKSARGEN"),
    ("regionxii", "Region XII"),
    ("regionxiii", "Caraga (Region XIII)"),
    ("regionxiii", "Caraga"),
    ("regionxiii", "Region XIII"),
    ("armm", "Bangsamoro Autonomous Region in Muslim Mindanao (BARMM)"),
    ("armm", "Bangsamoro Autonomous Region in Muslim Mindanao"),
    ("armm", "Autonomous Region in Muslim Mindanao (ARMM)"),
    ("armm", "Autonomous Region of Muslim Mindanao (ARMM)"),
    ("armm", "ARMM"),
    ("armm", "BARMM"),
];

/// Destination countries as named by the world atlas topology.
///
/// Both the major-country keys and the all-country keys appear, so several
/// keys share one geography. Every all-country key has an entry.
pub const COUNTRIES: &[(&str, &str)] = &[
    ("USA", "United States of America"),
    ("UNITED STATES OF AMERICA", "United States of America"),
    ("CANADA", "Canada"),
    ("JAPAN", "Japan"),
    ("AUSTRALIA", "Australia"),
    ("ITALY", "Italy"),
    ("NEW ZEALAND", "New Zealand"),
    ("UNITED KINGDOM", "United Kingdom"),
    ("GERMANY", "Germany"),
    ("SOUTH KOREA", "South Korea"),
    ("REPUBLIC OF KOREA", "South Korea"),
    ("SPAIN", "Spain"),
    ("FRANCE", "France"),
    ("SAUDI ARABIA", "Saudi Arabia"),
    ("UNITED ARAB EMIRATES", "United Arab Emirates"),
    ("SINGAPORE", "Singapore"),
    ("QATAR", "Qatar"),
    ("KUWAIT", "Kuwait"),
    ("BAHRAIN", "Bahrain"),
    ("MALAYSIA", "Malaysia"),
    ("RUSSIAN FEDERATION", "Russia"),
    // Remaining all-country keys
    ("ALBANIA", "Albania"),
    ("ANGOLA", "Angola"),
    ("ARGENTINA", "Argentina"),
    ("ARMENIA", "Armenia"),
    ("AUSTRIA", "Austria"),
    ("AZERBAIJAN", "Azerbaijan"),
    ("BAHAMAS", "Bahamas"),
    ("BANGLADESH", "Bangladesh"),
    ("BARBADOS", "Barbados"),
    ("BELARUS", "Belarus"),
    ("BELGIUM", "Belgium"),
    ("BELIZE", "Belize"),
    ("BENIN", "Benin"),
    ("BHUTAN", "Bhutan"),
    ("BOLIVIA (PLURINATIONAL STATE OF)", "Bolivia"),
    ("BOSNIA AND HERZEGOVINA", "Bosnia and Herzegovina"),
    ("BOTSWANA", "Botswana"),
    ("BRAZIL", "Brazil"),
    ("BULGARIA", "Bulgaria"),
    ("CAMBODIA", "Cambodia"),
    ("CHILE", "Chile"),
    ("CHINA", "China"),
    ("COLOMBIA", "Colombia"),
    ("CONGO", "Congo"),
    ("COSTA RICA", "Costa Rica"),
    ("CROATIA", "Croatia"),
    ("CYPRUS", "Cyprus"),
    ("CZECHIA", "Czechia"),
    ("DENMARK", "Denmark"),
    ("DOMINICAN REPUBLIC", "Dominican Republic"),
    ("ECUADOR", "Ecuador"),
    ("EGYPT", "Egypt"),
    ("EL SALVADOR", "El Salvador"),
    ("ESTONIA", "Estonia"),
    ("FIJI", "Fiji"),
    ("FINLAND", "Finland"),
    ("GEORGIA", "Georgia"),
    ("GREECE", "Greece"),
    ("GUATEMALA", "Guatemala"),
    ("HONDURAS", "Honduras"),
    ("HUNGARY", "Hungary"),
    ("ICELAND", "Iceland"),
    ("INDIA", "India"),
    ("INDONESIA", "Indonesia"),
    ("IRAN (ISLAMIC REPUBLIC OF)", "Iran"),
    ("IRAQ", "Iraq"),
    ("IRELAND", "Ireland"),
    ("ISRAEL", "Israel"),
    ("JAMAICA", "Jamaica"),
    ("JORDAN", "Jordan"),
    ("KAZAKHSTAN", "Kazakhstan"),
    ("KENYA", "Kenya"),
    ("KIRIBATI", "Kiribati"),
    ("KYRGYZSTAN", "Kyrgyzstan"),
    ("LATVIA", "Latvia"),
    ("LEBANON", "Lebanon"),
    ("LIBERIA", "Liberia"),
    ("LITHUANIA", "Lithuania"),
    ("LUXEMBOURG", "Luxembourg"),
    ("MACEDONIA (THE FORMER YUGOSLAV REPUBLIC OF)", "Macedonia"),
    ("MALDIVES", "Maldives"),
    ("MALI", "Mali"),
    ("MALTA", "Malta"),
    ("MAURITANIA", "Mauritania"),
    ("MAURITIUS", "Mauritius"),
    ("MEXICO", "Mexico"),
    ("MOLDOVA", "Moldova"),
    ("MONACO", "Monaco"),
    ("MONTENEGRO", "Montenegro"),
    ("MOROCCO", "Morocco"),
    ("MYANMAR", "Myanmar"),
    ("NAMIBIA", "Namibia"),
    ("NETHERLANDS", "Netherlands"),
    ("NICARAGUA", "Nicaragua"),
    ("NORWAY", "Norway"),
    ("OMAN", "Oman"),
    ("PAKISTAN", "Pakistan"),
    ("PANAMA", "Panama"),
    ("PARAGUAY", "Paraguay"),
    ("PERU", "Peru"),
    ("POLAND", "Poland"),
    ("PORTUGAL", "Portugal"),
    ("ROMANIA", "Romania"),
    ("SERBIA", "Serbia"),
    ("SLOVAKIA", "Slovakia"),
    ("SLOVENIA", "Slovenia"),
    ("SOUTH AFRICA", "South Africa"),
    ("SRI LANKA", "Sri Lanka"),
    ("SWEDEN", "Sweden"),
    ("SWITZERLAND", "Switzerland"),
    ("TAJIKISTAN", "Tajikistan"),
    ("THAILAND", "Thailand"),
    ("TURKEY", "Turkey"),
    ("UGANDA", "Uganda"),
    ("UKRAINE", "Ukraine"),
    ("URUGUAY", "Uruguay"),
    ("UZBEKISTAN", "Uzbekistan"),
    ("VENEZUELA (BOLIVARIAN REPUBLIC OF)", "Venezuela"),
    ("VIET NAM", "Vietnam"),
    ("YEMEN", "Yemen"),
    ("ZAMBIA", "Zambia"),
    ("ZIMBABWE", "Zimbabwe"),
];
