//! RegistrationDraft: the in-progress, not-yet-submitted registration form state

pub mod address;
pub mod billing;
pub mod path;
pub mod person;

pub use address::{AddressCascade, AddressLevel, LookupRequest, PostalAddress};
pub use billing::{InvoiceTitle, ProductLine, TitleType};
pub use path::{FieldPath, FieldPathError, PathSegment};
pub use person::{GuardianIdentity, GuardianInfo, GuestInfo, GuestType, Gender, Relationship};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Aggregate wizard state, addressed by camelCase field paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationDraft {
    pub guest: GuestInfo,
    pub is_self_guardian: bool,
    pub guardian: GuardianInfo,

    // Accommodation terms
    pub bed_id: String,
    pub season_code: String,
    pub check_in_date: String,
    pub check_out_date: String,
    pub deposit_amount: Option<f64>,
    pub notes: Option<String>,

    pub products: Vec<ProductLine>,
    pub invoice_titles: Vec<InvoiceTitle>,
}

impl RegistrationDraft {
    /// Empty draft with the given default nationality
    pub fn new(default_nationality: &str) -> Self {
        Self {
            guest: GuestInfo::new(default_nationality),
            is_self_guardian: false,
            guardian: GuardianInfo::default(),
            bed_id: String::new(),
            season_code: String::new(),
            check_in_date: String::new(),
            check_out_date: String::new(),
            deposit_amount: None,
            notes: None,
            products: Vec::new(),
            invoice_titles: Vec::new(),
        }
    }

    /// Serialized view the validation engine and field updates work on
    pub fn to_tree(&self) -> Result<Value, FieldPathError> {
        serde_json::to_value(self).map_err(|e| FieldPathError::Serialization {
            message: e.to_string(),
        })
    }

    /// Merge a single field change into the draft.
    ///
    /// The draft is untouched when the path is unknown, the value does not
    /// fit the field, or a written record carries keys the record lacks. A
    /// changed country or province clears the dependent selections of the
    /// same address, whether the id itself or an enclosing record was written.
    pub fn update_field(&mut self, path: &FieldPath, value: Value) -> Result<FieldUpdate, FieldPathError> {
        let mut tree = self.to_tree()?;
        let previous = path::set(&mut tree, path, value.clone())?;

        let mut updated: RegistrationDraft = serde_json::from_value(tree)
            .map_err(|e| FieldPathError::type_mismatch(path, &e.to_string()))?;

        let stored_tree = updated.to_tree()?;
        if let Some(stored) = path::get(&stored_tree, path)? {
            path::ensure_retained(&value, stored, path)?;
        }

        let cascade = match cascade_target(path) {
            Some(address_path) => {
                let before = self.address(&address_path).cloned();
                updated.apply_cascade(address_path, before.as_ref())
            }
            None => None,
        };

        *self = updated;

        Ok(FieldUpdate {
            path: path.clone(),
            previous,
            cascade,
        })
    }

    /// Clear dependents of whichever selection differs from `before`
    fn apply_cascade(
        &mut self,
        address_path: FieldPath,
        before: Option<&PostalAddress>,
    ) -> Option<AddressCascade> {
        let (country_before, province_before) =
            before.map_or((None, None), |a| (a.country_id, a.province_id));
        let address = self.address_mut(&address_path)?;

        let (level, selected) = if address.country_id != country_before {
            address.province_id = None;
            address.district_id = None;
            (AddressLevel::Country, address.country_id)
        } else if address.province_id != province_before {
            address.district_id = None;
            (AddressLevel::Province, address.province_id)
        } else {
            return None;
        };

        let cleared = level
            .dependent_keys()
            .iter()
            .map(|key| address_path.child(key))
            .collect();

        Some(AddressCascade {
            address: address_path,
            trigger: level,
            selected,
            cleared,
        })
    }

    /// Address record at `path` (`guest.address`, `guardian.address`,
    /// `invoiceTitles.N.address`)
    pub fn address(&self, path: &FieldPath) -> Option<&PostalAddress> {
        match path.segments() {
            [PathSegment::Key(root), PathSegment::Key(leaf)] if leaf == "address" => {
                match root.as_str() {
                    "guest" => Some(&self.guest.address),
                    "guardian" => Some(&self.guardian.address),
                    _ => None,
                }
            }
            [PathSegment::Key(root), PathSegment::Index(index), PathSegment::Key(leaf)]
                if root == "invoiceTitles" && leaf == "address" =>
            {
                self.invoice_titles.get(*index)?.address.as_ref()
            }
            _ => None,
        }
    }

    fn address_mut(&mut self, path: &FieldPath) -> Option<&mut PostalAddress> {
        match path.segments() {
            [PathSegment::Key(root), PathSegment::Key(leaf)] if leaf == "address" => {
                match root.as_str() {
                    "guest" => Some(&mut self.guest.address),
                    "guardian" => Some(&mut self.guardian.address),
                    _ => None,
                }
            }
            [PathSegment::Key(root), PathSegment::Index(index), PathSegment::Key(leaf)]
                if root == "invoiceTitles" && leaf == "address" =>
            {
                self.invoice_titles.get_mut(*index)?.address.as_mut()
            }
            _ => None,
        }
    }

    /// Guardian identity used downstream; the guest's own when self-guardian
    pub fn effective_guardian(&self) -> GuardianIdentity {
        if self.is_self_guardian {
            self.guest.as_guardian_identity()
        } else {
            self.guardian.identity()
        }
    }

    pub fn add_product(&mut self, line: ProductLine) -> usize {
        self.products.push(line);
        self.products.len() - 1
    }

    pub fn remove_product(&mut self, index: usize) -> Option<ProductLine> {
        if index < self.products.len() {
            Some(self.products.remove(index))
        } else {
            None
        }
    }

    /// Append an invoice title; the first one becomes the default
    pub fn add_invoice_title(&mut self, title_type: TitleType) -> usize {
        let mut title = InvoiceTitle::new(title_type);
        title.is_default = self.invoice_titles.is_empty();
        self.invoice_titles.push(title);
        self.invoice_titles.len() - 1
    }

    pub fn remove_invoice_title(&mut self, index: usize) -> Option<InvoiceTitle> {
        if index < self.invoice_titles.len() {
            Some(self.invoice_titles.remove(index))
        } else {
            None
        }
    }

    /// Mark one invoice title as default and clear the flag on the others
    pub fn set_default_invoice_title(&mut self, index: usize) -> bool {
        if index >= self.invoice_titles.len() {
            return false;
        }
        for (i, title) in self.invoice_titles.iter_mut().enumerate() {
            title.is_default = i == index;
        }
        true
    }

    pub fn default_invoice_title(&self) -> Option<&InvoiceTitle> {
        self.invoice_titles.iter().find(|title| title.is_default)
    }
}

/// Address record a write to `path` can change the selections of
fn cascade_target(path: &FieldPath) -> Option<FieldPath> {
    if path.leaf_key().and_then(AddressLevel::from_key).is_some() {
        return path.parent().filter(is_address_path);
    }
    if is_address_path(path) {
        return Some(path.clone());
    }
    Some(path.child("address")).filter(is_address_path)
}

fn is_address_path(path: &FieldPath) -> bool {
    match path.segments() {
        [PathSegment::Key(root), PathSegment::Key(leaf)] => {
            leaf == "address" && (root == "guest" || root == "guardian")
        }
        [PathSegment::Key(root), PathSegment::Index(_), PathSegment::Key(leaf)] => {
            root == "invoiceTitles" && leaf == "address"
        }
        _ => false,
    }
}

impl Default for RegistrationDraft {
    fn default() -> Self {
        Self::new(crate::config::compile_time::defaults::DEFAULT_NATIONALITY)
    }
}

/// Outcome of a single `update_field` call
#[derive(Debug, Clone, PartialEq)]
pub struct FieldUpdate {
    pub path: FieldPath,
    pub previous: Value,
    pub cascade: Option<AddressCascade>,
}

impl FieldUpdate {
    pub fn lookup_request(&self) -> Option<LookupRequest> {
        self.cascade.as_ref().map(AddressCascade::lookup_request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn path(raw: &str) -> FieldPath {
        FieldPath::parse(raw).unwrap()
    }

    #[test]
    fn test_default_draft_values() {
        let draft = RegistrationDraft::new("TR");
        assert_eq!(draft.guest.gender, Gender::Male);
        assert_eq!(draft.guest.guest_type, GuestType::Student);
        assert_eq!(draft.guest.nationality, "TR");
        assert!(!draft.is_self_guardian);
        assert!(draft.products.is_empty());
        assert!(draft.invoice_titles.is_empty());
    }

    #[test]
    fn test_update_field_merges_value() {
        let mut draft = RegistrationDraft::new("TR");
        let update = draft.update_field(&path("guest.name"), json!("Ayse")).unwrap();

        assert_eq!(draft.guest.name, "Ayse");
        assert_eq!(update.previous, json!(""));
        assert!(update.cascade.is_none());
    }

    #[test]
    fn test_update_field_sets_enum_and_flag() {
        let mut draft = RegistrationDraft::new("TR");
        draft
            .update_field(&path("guardian.relationship"), json!("FATHER"))
            .unwrap();
        draft.update_field(&path("isSelfGuardian"), json!(true)).unwrap();

        assert_eq!(draft.guardian.relationship, Some(Relationship::Father));
        assert!(draft.is_self_guardian);
    }

    #[test]
    fn test_update_field_rejects_wrong_type_and_keeps_draft() {
        let mut draft = RegistrationDraft::new("TR");
        draft.add_product(ProductLine::new("rent", 1, 10.0));
        let before = draft.clone();

        let result = draft.update_field(&path("products.0.quantity"), json!("many"));

        assert_matches!(result, Err(FieldPathError::TypeMismatch { .. }));
        assert_eq!(draft, before);
    }

    #[test]
    fn test_update_field_rejects_unknown_path() {
        let mut draft = RegistrationDraft::new("TR");
        assert_matches!(
            draft.update_field(&path("guest.middleName"), json!("x")),
            Err(FieldPathError::UnknownField { .. })
        );
    }

    #[test]
    fn test_update_field_rejects_unknown_key_in_absent_record() {
        let mut draft = RegistrationDraft::new("TR");
        draft.add_invoice_title(TitleType::Individual);
        let before = draft.clone();

        assert_matches!(
            draft.update_field(&path("invoiceTitles.0.address.street"), json!("x")),
            Err(FieldPathError::UnknownField { .. })
        );
        assert_eq!(draft, before);
    }

    #[test]
    fn test_country_change_clears_province_and_district() {
        let mut draft = RegistrationDraft::new("TR");
        draft.update_field(&path("guest.address.countryId"), json!(1)).unwrap();
        draft.update_field(&path("guest.address.provinceId"), json!(34)).unwrap();
        draft.update_field(&path("guest.address.districtId"), json!(7)).unwrap();

        let update = draft
            .update_field(&path("guest.address.countryId"), json!(2))
            .unwrap();

        assert_eq!(draft.guest.address.country_id, Some(2));
        assert_eq!(draft.guest.address.province_id, None);
        assert_eq!(draft.guest.address.district_id, None);

        let cascade = update.cascade.unwrap();
        assert_eq!(cascade.trigger, AddressLevel::Country);
        assert_eq!(cascade.selected, Some(2));
        assert_eq!(cascade.address, path("guest.address"));
        assert_eq!(cascade.cleared.len(), 2);
        assert_eq!(cascade.lookup_request(), LookupRequest::Provinces(Some(2)));
    }

    #[test]
    fn test_province_change_clears_district() {
        let mut draft = RegistrationDraft::new("TR");
        draft.update_field(&path("guardian.address.countryId"), json!(1)).unwrap();
        draft.update_field(&path("guardian.address.provinceId"), json!(34)).unwrap();
        draft.update_field(&path("guardian.address.districtId"), json!(7)).unwrap();

        draft
            .update_field(&path("guardian.address.provinceId"), json!(6))
            .unwrap();

        assert_eq!(draft.guardian.address.country_id, Some(1));
        assert_eq!(draft.guardian.address.province_id, Some(6));
        assert_eq!(draft.guardian.address.district_id, None);
    }

    #[test]
    fn test_same_country_is_not_a_change() {
        let mut draft = RegistrationDraft::new("TR");
        draft.update_field(&path("guest.address.countryId"), json!(1)).unwrap();
        draft.update_field(&path("guest.address.provinceId"), json!(34)).unwrap();

        let update = draft
            .update_field(&path("guest.address.countryId"), json!(1))
            .unwrap();

        assert!(update.cascade.is_none());
        assert_eq!(draft.guest.address.province_id, Some(34));
    }

    #[test]
    fn test_invoice_title_address_is_materialised() {
        let mut draft = RegistrationDraft::new("TR");
        draft.add_invoice_title(TitleType::Corporate);

        draft
            .update_field(&path("invoiceTitles.0.address.countryId"), json!(90))
            .unwrap();
        let update = draft
            .update_field(&path("invoiceTitles.0.address.countryId"), json!(91))
            .unwrap();

        let address = draft.invoice_titles[0].address.as_ref().unwrap();
        assert_eq!(address.country_id, Some(91));
        assert!(update.cascade.is_some());
    }

    #[test]
    fn test_replacing_address_record_applies_cascade() {
        let mut draft = RegistrationDraft::new("TR");
        draft.update_field(&path("guest.address.countryId"), json!(1)).unwrap();
        draft.update_field(&path("guest.address.provinceId"), json!(34)).unwrap();
        draft.update_field(&path("guest.address.districtId"), json!(7)).unwrap();

        let update = draft
            .update_field(
                &path("guest.address"),
                json!({"countryId": 2, "provinceId": 34, "districtId": 7, "postalCode": "06100"}),
            )
            .unwrap();

        let address = &draft.guest.address;
        assert_eq!(address.country_id, Some(2));
        assert_eq!(address.province_id, None);
        assert_eq!(address.district_id, None);
        assert_eq!(address.postal_code.as_deref(), Some("06100"));

        let cascade = update.cascade.unwrap();
        assert_eq!(cascade.trigger, AddressLevel::Country);
        assert_eq!(cascade.address, path("guest.address"));
    }

    #[test]
    fn test_replacing_address_record_with_new_province_clears_district() {
        let mut draft = RegistrationDraft::new("TR");
        draft.update_field(&path("guardian.address.countryId"), json!(1)).unwrap();
        draft.update_field(&path("guardian.address.provinceId"), json!(34)).unwrap();
        draft.update_field(&path("guardian.address.districtId"), json!(7)).unwrap();

        let update = draft
            .update_field(
                &path("guardian.address"),
                json!({"countryId": 1, "provinceId": 6, "districtId": 7}),
            )
            .unwrap();

        assert_eq!(draft.guardian.address.province_id, Some(6));
        assert_eq!(draft.guardian.address.district_id, None);
        assert_eq!(update.lookup_request(), Some(LookupRequest::Districts(Some(6))));
    }

    #[test]
    fn test_replacing_enclosing_record_applies_cascade() {
        let mut draft = RegistrationDraft::new("TR");
        draft.add_invoice_title(TitleType::Individual);
        draft
            .update_field(&path("invoiceTitles.0.address.countryId"), json!(1))
            .unwrap();
        draft
            .update_field(&path("invoiceTitles.0.address.provinceId"), json!(34))
            .unwrap();

        let mut title = serde_json::to_value(&draft.invoice_titles[0]).unwrap();
        title["address"]["countryId"] = json!(2);
        draft.update_field(&path("invoiceTitles.0"), title).unwrap();

        let address = draft.invoice_titles[0].address.as_ref().unwrap();
        assert_eq!(address.country_id, Some(2));
        assert_eq!(address.province_id, None);
    }

    #[test]
    fn test_replacing_address_record_rejects_unknown_key() {
        let mut draft = RegistrationDraft::new("TR");
        draft.update_field(&path("guest.address.countryId"), json!(1)).unwrap();
        let before = draft.clone();

        assert_matches!(
            draft.update_field(&path("guest.address"), json!({"countryId": 2, "bogus": 1})),
            Err(FieldPathError::UnknownField { segment, .. }) if segment == "bogus"
        );
        assert_eq!(draft, before);
    }

    #[test]
    fn test_effective_guardian_uses_guest_when_self() {
        let mut draft = RegistrationDraft::new("TR");
        draft.guest.name = "Ayse".to_string();
        draft.guardian.name = "Fatma".to_string();

        assert_eq!(draft.effective_guardian().name, "Fatma");
        draft.is_self_guardian = true;
        assert_eq!(draft.effective_guardian().name, "Ayse");
    }

    #[test]
    fn test_invoice_title_default_bookkeeping() {
        let mut draft = RegistrationDraft::new("TR");
        draft.add_invoice_title(TitleType::Individual);
        draft.add_invoice_title(TitleType::Corporate);

        assert!(draft.invoice_titles[0].is_default);
        assert!(!draft.invoice_titles[1].is_default);

        assert!(draft.set_default_invoice_title(1));
        assert!(!draft.invoice_titles[0].is_default);
        assert_eq!(
            draft.default_invoice_title().map(|t| t.title_type),
            Some(TitleType::Corporate)
        );
        assert!(!draft.set_default_invoice_title(5));
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut draft = RegistrationDraft::new("TR");
        assert!(draft.remove_product(0).is_none());
        draft.add_product(ProductLine::default());
        assert!(draft.remove_product(0).is_some());
        assert!(draft.remove_invoice_title(0).is_none());
    }
}
