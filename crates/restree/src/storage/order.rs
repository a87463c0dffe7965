//! Sibling ordering for directory children.

use std::cmp::Ordering;
use std::ffi::OsStr;

use super::resource::Resource;

/// Anything that can be placed in a directory's child list.
pub trait SiblingKey {
    fn sibling_is_dir(&self) -> bool;
    fn sibling_name(&self) -> &OsStr;
}

impl SiblingKey for Resource {
    fn sibling_is_dir(&self) -> bool {
        self.is_dir()
    }

    fn sibling_name(&self) -> &OsStr {
        self.name()
    }
}

/// Directories sort before everything else; ties break on the byte-wise name.
pub fn compare_siblings<A, B>(a: &A, b: &B) -> Ordering
where
    A: SiblingKey + ?Sized,
    B: SiblingKey + ?Sized,
{
    b.sibling_is_dir()
        .cmp(&a.sibling_is_dir())
        .then_with(|| a.sibling_name().cmp(b.sibling_name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ResourceFlags, ResourceId};
    use std::path::PathBuf;

    fn dir(name: &str) -> Resource {
        Resource::directory(
            name.into(),
            ResourceId::ROOT,
            PathBuf::from("/").join(name),
            ResourceFlags::empty(),
        )
    }

    fn file(name: &str) -> Resource {
        Resource::leaf(name.into(), ResourceId::ROOT)
    }

    #[test]
    fn directories_first_then_bytewise_names() {
        let mut siblings = vec![file("b"), file("A"), file("z.go"), dir("dir2"), dir("dir1")];
        siblings.sort_by(compare_siblings);

        let names: Vec<_> = siblings.iter().map(|r| r.name().to_os_string()).collect();
        assert_eq!(names, vec!["dir1", "dir2", "A", "b", "z.go"]);
    }

    #[test]
    fn directory_beats_smaller_file_name() {
        assert_eq!(compare_siblings(&dir("z"), &file("a")), Ordering::Less);
        assert_eq!(compare_siblings(&file("a"), &dir("z")), Ordering::Greater);
        assert_eq!(compare_siblings(&file("a"), &file("a")), Ordering::Equal);
    }
}
