//! Departments, display languages and the department → mailbox directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Display language of the report form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    pub fn is_rtl(&self) -> bool {
        matches!(self, Language::Ar)
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "ar" | "arabic" => Ok(Language::Ar),
            other => Err(format!("Unsupported language: {}", other)),
        }
    }
}

/// Department a report is addressed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Department {
    Hr,
    Finance,
    It,
    Compliance,
    Project,
    Other,
}

impl Department {
    /// Departments in the order the form presents them.
    pub const ALL: [Department; 6] = [
        Department::Hr,
        Department::Finance,
        Department::It,
        Department::Compliance,
        Department::Project,
        Department::Other,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Department::Hr => "hr",
            Department::Finance => "finance",
            Department::It => "it",
            Department::Compliance => "compliance",
            Department::Project => "project",
            Department::Other => "other",
        }
    }

    pub fn display_name(&self, language: Language) -> &'static str {
        match (self, language) {
            (Department::Hr, Language::En) => "Human Resources",
            (Department::Finance, Language::En) => "Finance",
            (Department::It, Language::En) => "Information Technology",
            (Department::Compliance, Language::En) => "Contracts & Compliance",
            (Department::Project, Language::En) => "Project Management",
            (Department::Other, Language::En) => "Other",
            (Department::Hr, Language::Ar) => "الموارد البشرية",
            (Department::Finance, Language::Ar) => "المالية",
            (Department::It, Language::Ar) => "تقنية المعلومات",
            (Department::Compliance, Language::Ar) => "العقود والامتثال",
            (Department::Project, Language::Ar) => "إدارة المشاريع",
            (Department::Other, Language::Ar) => "أخرى",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Department {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_lowercase();
        Department::ALL
            .iter()
            .copied()
            .find(|d| d.id() == id)
            .ok_or_else(|| format!("Unknown department: {}", s))
    }
}

/// Static department → destination address mapping.
#[derive(Clone, Debug)]
pub struct DepartmentDirectory {
    addresses: HashMap<Department, String>,
}

impl Default for DepartmentDirectory {
    fn default() -> Self {
        let addresses = [
            (Department::Hr, "hr@company.com"),
            (Department::Finance, "finance@company.com"),
            (Department::It, "it@company.com"),
            (Department::Compliance, "compliance@company.com"),
            (Department::Other, "other@company.com"),
            (Department::Project, "projectmanagement@company.com"),
        ]
        .into_iter()
        .map(|(d, a)| (d, a.to_string()))
        .collect();
        Self { addresses }
    }
}

impl DepartmentDirectory {
    /// Replace the address for one department.
    pub fn with_address(mut self, department: Department, address: impl Into<String>) -> Self {
        self.addresses.insert(department, address.into());
        self
    }

    pub fn address_for(&self, department: Department) -> Option<&str> {
        self.addresses
            .get(&department)
            .map(String::as_str)
            .filter(|a| !a.trim().is_empty())
    }
}
