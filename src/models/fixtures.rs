//! Fixture data sent to the portal
//!
//! Defaults describe a single farming household; a config file may replace any of them.

use serde::{Deserialize, Serialize};

/// Account used for registration and login
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserFixture {
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub password: String,
}

impl Default for UserFixture {
    fn default() -> Self {
        Self {
            email: "rajesh.kumar@gmail.com".to_string(),
            username: "rajesh_kumar".to_string(),
            full_name: "Rajesh Kumar Singh".to_string(),
            password: "SecurePass123!".to_string(),
        }
    }
}

impl UserFixture {
    /// Body for `POST /login`
    pub fn credentials(&self) -> LoginRequest<'_> {
        LoginRequest {
            username: &self.username,
            password: &self.password,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// One member of a family profile
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FamilyMember {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub relationship: String,
    pub education: String,
    pub occupation: String,
    pub disability: bool,
}

impl FamilyMember {
    fn new(
        name: &str,
        age: u32,
        gender: &str,
        relationship: &str,
        education: &str,
        occupation: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            age,
            gender: gender.to_string(),
            relationship: relationship.to_string(),
            education: education.to_string(),
            occupation: occupation.to_string(),
            disability: false,
        }
    }
}

/// Household profile submitted to `POST /family`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FamilyProfile {
    pub family_head_name: String,
    pub age: u32,
    pub gender: String,
    pub caste_category: String,
    pub occupation: String,
    pub annual_income: f64,
    pub education_level: String,
    pub disability: bool,
    pub family_members: Vec<FamilyMember>,
}

impl Default for FamilyProfile {
    fn default() -> Self {
        Self {
            family_head_name: "Rajesh Kumar Singh".to_string(),
            age: 45,
            gender: "Male".to_string(),
            caste_category: "OBC".to_string(),
            occupation: "Farmer".to_string(),
            annual_income: 85000.0,
            education_level: "Class 10".to_string(),
            disability: false,
            family_members: vec![
                FamilyMember::new("Sunita Singh", 40, "Female", "Wife", "Class 8", "Homemaker"),
                FamilyMember::new("Amit Kumar Singh", 18, "Male", "Son", "Class 12", "Student"),
                FamilyMember::new("Priya Singh", 15, "Female", "Daughter", "Class 9", "Student"),
            ],
        }
    }
}

/// Document sent to `POST /upload-document`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentFixture {
    pub filename: String,
    pub document_type: String,
    pub mime: String,
    pub content: String,
}

impl Default for DocumentFixture {
    fn default() -> Self {
        Self {
            filename: "aadhaar_card.txt".to_string(),
            document_type: "aadhaar_card".to_string(),
            mime: "text/plain".to_string(),
            content: "This is a test Aadhaar card document for Rajesh Kumar Singh".to_string(),
        }
    }
}

/// Scheme names the eligibility engine must always score
pub fn default_expected_schemes() -> Vec<String> {
    ["PM-KISAN", "MGNREGA", "PM-JAY", "PMAY-Gramin", "Jan Aushadhi"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// All fixture data for one run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixtures {
    pub user: UserFixture,
    pub family: FamilyProfile,
    pub document: DocumentFixture,
    pub expected_schemes: Vec<String>,
}

impl Default for Fixtures {
    fn default() -> Self {
        Self {
            user: UserFixture::default(),
            family: FamilyProfile::default(),
            document: DocumentFixture::default(),
            expected_schemes: default_expected_schemes(),
        }
    }
}
