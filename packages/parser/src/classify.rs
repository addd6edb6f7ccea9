use crate::ast::{ExportKind, Statement, StatementKind};

/// Decides which top-level statements are components
pub trait DeclarationClassifier: Send + Sync {
    fn is_component(&self, statement: &Statement) -> bool;
}

/// A declaration that returns markup and is either named in PascalCase or
/// is an anonymous `export default function`.
///
/// Only markup in a direct return position counts, so `cond ? <A /> : <B />`
/// is not a return. `export default () => ...` is an expression statement,
/// not a declaration, and is never a component.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentShape;

impl DeclarationClassifier for ComponentShape {
    fn is_component(&self, statement: &Statement) -> bool {
        let StatementKind::Declaration(decl) = &statement.kind else {
            return false;
        };
        let component_name = match decl.name.as_deref() {
            Some(name) => name.chars().next().is_some_and(|c| c.is_ascii_uppercase()),
            None => decl.export == Some(ExportKind::Default),
        };

        component_name && !decl.returns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn classify(source: &str) -> Vec<bool> {
        let file = parse(source).expect("Parse failed");
        file.statements
            .iter()
            .map(|statement| ComponentShape.is_component(statement))
            .collect()
    }

    #[test]
    fn test_component_shapes() {
        let source = r#"import { cx } from "./cx";
const helper = () => <span />;
const Empty = () => null;
export const Title = () => <h1>Title</h1>;
function Page() {
  return <main><Title /></main>;
}
export default () => <div />;
"#;
        assert_eq!(classify(source), vec![false, false, false, true, true, false]);
    }

    #[test]
    fn test_anonymous_default_function() {
        let source = "export default function () {
  return <nav />;
}
";
        assert_eq!(classify(source), vec![true]);

        let source = "export default function () {
  return null;
}
";
        assert_eq!(classify(source), vec![false]);
    }

    #[test]
    fn test_ternary_is_not_a_return() {
        let source = "const Toggle = ({ on }) => (on ? <b /> : <i />);
";
        assert_eq!(classify(source), vec![false]);
    }
}
