//! Per-class publish results.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::asset::AssetClass;

/// Where a class's artifact lives and whether this run (re)published it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishResult {
    pub url: String,
    pub changed: bool,
}

/// One optional result per class; `None` when the class selected no files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssetManifest {
    pub javascripts: Option<PublishResult>,
    pub stylesheets: Option<PublishResult>,
    pub images: Option<PublishResult>,
    pub extras: Option<PublishResult>,
}

impl AssetManifest {
    pub fn get(&self, class: AssetClass) -> Option<&PublishResult> {
        self.slot(class).as_ref()
    }

    pub fn set(&mut self, class: AssetClass, result: Option<PublishResult>) {
        *self.slot_mut(class) = result;
    }

    /// URLs without the changed flags, for persisting or display.
    pub fn urls(&self) -> BTreeMap<AssetClass, String> {
        AssetClass::ALL
            .into_iter()
            .filter_map(|class| self.get(class).map(|r| (class, r.url.clone())))
            .collect()
    }

    pub fn any_changed(&self) -> bool {
        AssetClass::ALL
            .into_iter()
            .any(|class| self.get(class).is_some_and(|r| r.changed))
    }

    fn slot(&self, class: AssetClass) -> &Option<PublishResult> {
        match class {
            AssetClass::Javascripts => &self.javascripts,
            AssetClass::Stylesheets => &self.stylesheets,
            AssetClass::Images => &self.images,
            AssetClass::Extras => &self.extras,
        }
    }

    fn slot_mut(&mut self, class: AssetClass) -> &mut Option<PublishResult> {
        match class {
            AssetClass::Javascripts => &mut self.javascripts,
            AssetClass::Stylesheets => &mut self.stylesheets,
            AssetClass::Images => &mut self.images,
            AssetClass::Extras => &mut self.extras,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_strip_flags_in_class_order() {
        let mut manifest = AssetManifest::default();
        manifest.set(
            AssetClass::Images,
            Some(PublishResult {
                url: "https://cdn/images".into(),
                changed: false,
            }),
        );
        manifest.set(
            AssetClass::Javascripts,
            Some(PublishResult {
                url: "https://cdn/js/abc.js".into(),
                changed: true,
            }),
        );

        let json = serde_json::to_string(&manifest.urls()).unwrap();
        assert_eq!(
            json,
            r#"{"javascripts":"https://cdn/js/abc.js","images":"https://cdn/images"}"#
        );
        assert!(manifest.any_changed());
        assert_eq!(manifest.get(AssetClass::Extras), None);
    }
}
