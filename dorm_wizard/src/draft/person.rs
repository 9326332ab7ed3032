//! Guest and guardian records

use super::address::PostalAddress;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuestType {
    #[default]
    Student,
    Employee,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relationship {
    Mother,
    Father,
    Sibling,
    Spouse,
    Relative,
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
        }
    }
}

impl fmt::Display for GuestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuestType::Student => write!(f, "Student"),
            GuestType::Employee => write!(f, "Employee"),
            GuestType::Other => write!(f, "Other"),
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Relationship::Mother => "Mother",
            Relationship::Father => "Father",
            Relationship::Sibling => "Sibling",
            Relationship::Spouse => "Spouse",
            Relationship::Relative => "Relative",
            Relationship::Other => "Other",
        };
        write!(f, "{}", label)
    }
}

/// Guest being registered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuestInfo {
    pub name: String,
    pub surname: String,
    pub gender: Gender,
    pub national_id: String,
    pub phone: String,
    pub email: Option<String>,
    pub birth_date: String,
    pub nationality: String,
    pub guest_type: GuestType,

    // Education
    pub school: Option<String>,
    pub department: Option<String>,
    pub student_number: Option<String>,
    pub grade: Option<String>,

    // Emergency contact
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub emergency_contact_relationship: Option<String>,

    pub address: PostalAddress,
}

impl GuestInfo {
    pub fn new(nationality: &str) -> Self {
        Self {
            name: String::new(),
            surname: String::new(),
            gender: Gender::default(),
            national_id: String::new(),
            phone: String::new(),
            email: None,
            birth_date: String::new(),
            nationality: nationality.to_string(),
            guest_type: GuestType::default(),
            school: None,
            department: None,
            student_number: None,
            grade: None,
            emergency_contact_name: String::new(),
            emergency_contact_phone: String::new(),
            emergency_contact_relationship: None,
            address: PostalAddress::default(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname).trim().to_string()
    }

    /// The guest's identity standing in for a guardian
    pub fn as_guardian_identity(&self) -> GuardianIdentity {
        GuardianIdentity {
            name: self.name.clone(),
            surname: self.surname.clone(),
            gender: Some(self.gender),
            national_id: self.national_id.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            birth_date: self.birth_date.clone(),
            relationship: None,
        }
    }
}

impl Default for GuestInfo {
    fn default() -> Self {
        Self::new(crate::config::compile_time::defaults::DEFAULT_NATIONALITY)
    }
}

/// Legal responsible party; ignored when the guest is their own guardian
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuardianInfo {
    pub name: String,
    pub surname: String,
    pub gender: Option<Gender>,
    pub national_id: String,
    pub phone: String,
    pub email: Option<String>,
    pub birth_date: String,
    pub relationship: Option<Relationship>,
    pub occupation: Option<String>,
    pub workplace: Option<String>,
    pub address: PostalAddress,
}

impl GuardianInfo {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname).trim().to_string()
    }

    pub fn identity(&self) -> GuardianIdentity {
        GuardianIdentity {
            name: self.name.clone(),
            surname: self.surname.clone(),
            gender: self.gender,
            national_id: self.national_id.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            birth_date: self.birth_date.clone(),
            relationship: self.relationship,
        }
    }
}

/// Identity fields shared by a guardian and a self-guardian guest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardianIdentity {
    pub name: String,
    pub surname: String,
    pub gender: Option<Gender>,
    pub national_id: String,
    pub phone: String,
    pub email: Option<String>,
    pub birth_date: String,
    pub relationship: Option<Relationship>,
}
