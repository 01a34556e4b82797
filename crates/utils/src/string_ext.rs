/// Extends string types with useful functions
pub trait StringExt {
    /// Capilalises the first letter in a string
    ///
    /// Used to build camel-case names, e.g. the exposure variant of a weight
    /// tensor name.
    ///
    /// ```rust
    /// # use ctools_utils::StringExt;
    /// assert_eq!("assemblyWeights".capitalise(), "AssemblyWeights".to_string());
    /// assert_eq!("".capitalise(), "".to_string());
    /// ```
    fn capitalise(&self) -> String;
}

impl<T: AsRef<str>> StringExt for T {
    fn capitalise(&self) -> String {
        let mut c = self.as_ref().chars();
        match c.next() {
            Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
            None => String::new(),
        }
    }
}
