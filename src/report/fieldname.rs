use std::collections::{HashMap, HashSet};

use crate::docker::Container;

/// Turns a container name into a valid Munin field name.
///
/// Munin field names must match `^[A-Za-z_][A-Za-z0-9_]*$`, and `root` is
/// reserved.
pub fn clean_fieldname(name: &str) -> String {
    if name == "root" {
        return "_root".to_owned();
    }
    name.chars()
        .enumerate()
        .map(|(i, c)| {
            if c.is_ascii_alphabetic() || c == '_' || (i > 0 && c.is_ascii_digit()) {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Field names of the containers in one graph, unique per container id.
///
/// Names that clean to a field already taken get `_2`, `_3`, ... appended, in
/// the order the containers are first seen.
#[derive(Debug, Default)]
pub struct FieldNames {
    by_id: HashMap<String, String>,
    taken: HashSet<String>,
}

impl FieldNames {
    pub fn new<'a>(containers: impl IntoIterator<Item = &'a Container>) -> Self {
        let mut fields = Self::default();
        for container in containers {
            fields.get(&container.id, container.name());
        }
        fields
    }

    /// The field of container `id`, allocating one from `name` if it has none yet.
    pub fn get(&mut self, id: &str, name: &str) -> String {
        if let Some(field) = self.by_id.get(id) {
            return field.clone();
        }

        let base = clean_fieldname(name);
        let mut field = base.clone();
        let mut n = 1;
        while self.taken.contains(&field) {
            n += 1;
            field = format!("{base}_{n}");
        }
        self.taken.insert(field.clone());
        self.by_id.insert(id.to_owned(), field.clone());
        field
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docker::ContainerStatus::Running;
    use crate::docker::fake::container;

    #[test]
    fn test_clean_fieldname() {
        assert_eq!(clean_fieldname("web"), "web");
        assert_eq!(clean_fieldname("my-app.1"), "my_app_1");
        assert_eq!(clean_fieldname("1password"), "_password");
        assert_eq!(clean_fieldname("db_2"), "db_2");
        assert_eq!(clean_fieldname("root"), "_root");
        assert_eq!(clean_fieldname("rootless"), "rootless");
        assert_eq!(clean_fieldname("café"), "caf_");
    }

    #[test]
    fn test_colliding_names_get_a_suffix() {
        let containers = [
            container("web-1", Running, 1),
            container("web.1", Running, 2),
            container("web_1_2", Running, 3),
            container("web_1", Running, 4),
        ];
        let mut fields = FieldNames::new(&containers);
        let names: Vec<String> = containers
            .iter()
            .map(|c| fields.get(&c.id, c.name()))
            .collect();
        assert_eq!(names, vec!["web_1", "web_1_2", "web_1_2_2", "web_1_3"]);
    }

    #[test]
    fn test_unknown_container_gets_a_fresh_field() {
        let containers = [container("db", Running, 1)];
        let mut fields = FieldNames::new(&containers);
        assert_eq!(fields.get("db-id", "db"), "db");
        assert_eq!(fields.get("other-id", "db"), "db_2");
        assert_eq!(fields.get("other-id", "db"), "db_2");
    }
}
