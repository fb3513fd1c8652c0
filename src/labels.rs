use std::collections::HashMap;

use crate::timeline::interpolate;
use crate::types::Annotation;

/// First-seen-order mapping from label names to dense integer ids.
///
/// Ids depend only on the order in which distinct names first appear across
/// the whole conversion run. The registry is threaded explicitly through the
/// orchestrator; it is never ambient state.
#[derive(Debug, Default, Clone)]
pub struct LabelRegistry {
    ids: HashMap<String, usize>,
    names: Vec<String>,
}

impl LabelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id for `label`, assigning the next sequential one on first sight.
    pub fn get_or_assign(&mut self, label: &str) -> usize {
        if let Some(&id) = self.ids.get(label) {
            return id;
        }
        let id = self.names.len();
        self.ids.insert(label.to_string(), id);
        self.names.push(label.to_string());
        id
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.ids.get(label).copied()
    }

    /// Label names ordered by their assigned ids.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Generate the YOLO label lines for one sampled frame.
///
/// Every annotated object is interpolated at the frame's normalized time;
/// objects absent at that time contribute nothing and claim no id. Boxes are
/// converted to center form and every component is clamped to [0,1]
/// independently.
pub fn generate_labels(
    annotation: &Annotation,
    normalized_time: f64,
    registry: &mut LabelRegistry,
) -> Vec<String> {
    let mut lines = Vec::new();
    for object in &annotation.objects {
        if let Some(bbox) = interpolate(&object.timeline, normalized_time) {
            let label_id = registry.get_or_assign(&object.label);
            let x_center = (bbox.sx + bbox.w / 2.0).clamp(0.0, 1.0);
            let y_center = (bbox.sy + bbox.h / 2.0).clamp(0.0, 1.0);
            let width = bbox.w.clamp(0.0, 1.0);
            let height = bbox.h.clamp(0.0, 1.0);
            lines.push(format!(
                "{} {:.6} {:.6} {:.6} {:.6}",
                label_id, x_center, y_center, width, height
            ));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnnotatedObject, BoundingBox};

    fn object_with_span(label: &str, from: BoundingBox, to: BoundingBox) -> AnnotatedObject {
        let mut timeline = HashMap::new();
        timeline.insert("0.10000".to_string(), from);
        timeline.insert("0.90000".to_string(), to);
        AnnotatedObject {
            label: label.to_string(),
            timeline,
        }
    }

    #[test]
    fn test_first_seen_order() {
        let mut registry = LabelRegistry::new();
        for label in ["cat", "dog", "cat", "bird"] {
            registry.get_or_assign(label);
        }
        assert_eq!(registry.get("cat"), Some(0));
        assert_eq!(registry.get("dog"), Some(1));
        assert_eq!(registry.get("bird"), Some(2));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.names(), &["cat", "dog", "bird"]);
    }

    #[test]
    fn test_generate_labels_center_form() {
        let bbox = BoundingBox {
            sx: 0.1,
            sy: 0.2,
            w: 0.2,
            h: 0.4,
        };
        let annotation = Annotation {
            objects: vec![object_with_span("car", bbox, bbox)],
        };
        let mut registry = LabelRegistry::new();
        let lines = generate_labels(&annotation, 0.5, &mut registry);
        assert_eq!(lines, vec!["0 0.200000 0.400000 0.200000 0.400000"]);
    }

    #[test]
    fn test_generate_labels_clamps_components() {
        let bbox = BoundingBox {
            sx: 0.9,
            sy: 0.9,
            w: 0.4,
            h: 0.4,
        };
        let annotation = Annotation {
            objects: vec![object_with_span("car", bbox, bbox)],
        };
        let mut registry = LabelRegistry::new();
        let lines = generate_labels(&annotation, 0.5, &mut registry);
        assert_eq!(lines, vec!["0 1.000000 1.000000 0.400000 0.400000"]);
    }

    #[test]
    fn test_absent_objects_claim_no_id() {
        let visible = BoundingBox {
            sx: 0.1,
            sy: 0.1,
            w: 0.2,
            h: 0.2,
        };
        let mut early = HashMap::new();
        early.insert("0.01000".to_string(), visible);
        early.insert("0.05000".to_string(), visible);
        let annotation = Annotation {
            objects: vec![
                AnnotatedObject {
                    label: "gone".to_string(),
                    timeline: early,
                },
                object_with_span("seen", visible, visible),
            ],
        };
        let mut registry = LabelRegistry::new();
        let lines = generate_labels(&annotation, 0.5, &mut registry);
        assert_eq!(lines.len(), 1);
        assert_eq!(registry.get("gone"), None);
        assert_eq!(registry.get("seen"), Some(0));
    }
}
