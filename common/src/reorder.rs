//! パネル項目の並べ替え
//!
//! ドラッグ操作は「並べ替え可能な要素だけ」を数えた表示位置
//! (old, new) で通知される。正規リストには並べ替え対象外の要素が
//! 混在しうるため、移動先は表示位置ではなく「その位置にある要素の直前」
//! として解決する。

use crate::panel::PanelItem;

/// 並べ替えの対象になる要素
pub trait Reorderable {
    fn is_reorderable(&self) -> bool;
}

impl Reorderable for PanelItem {
    fn is_reorderable(&self) -> bool {
        // シーケンスとスケジュール区切りはどちらも並べ替え可能
        true
    }
}

fn reorderable_indices<T: Reorderable>(items: &[T]) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.is_reorderable())
        .map(|(i, _)| i)
        .collect()
}

/// 表示位置 `old_position` の要素を `new_position` へ移動する
///
/// 変更があった場合に true。同一位置・要素1つ以下・範囲外の移動元は何もしない。
pub fn reorder<T: Reorderable>(items: &mut Vec<T>, old_position: usize, new_position: usize) -> bool {
    if old_position == new_position {
        return false;
    }
    let visible = reorderable_indices(items);
    if visible.len() <= 1 {
        return false;
    }
    let Some(&source) = visible.get(old_position) else {
        return false;
    };

    let moved = items.remove(source);
    let remaining = reorderable_indices(items);
    match remaining.get(new_position) {
        Some(&anchor) => items.insert(anchor, moved),
        None => items.push(moved),
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        name: &'static str,
        movable: bool,
    }

    impl Reorderable for Item {
        fn is_reorderable(&self) -> bool {
            self.movable
        }
    }

    fn movable(name: &'static str) -> Item {
        Item { name, movable: true }
    }

    fn fixed(name: &'static str) -> Item {
        Item { name, movable: false }
    }

    fn names(items: &[Item]) -> Vec<&'static str> {
        items.iter().map(|i| i.name).collect()
    }

    #[test]
    fn test_move_forward_and_back() {
        let mut items = vec![movable("a"), movable("b"), movable("c"), movable("d")];
        assert!(reorder(&mut items, 0, 2));
        assert_eq!(names(&items), vec!["b", "c", "a", "d"]);

        assert!(reorder(&mut items, 3, 0));
        assert_eq!(names(&items), vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn test_move_to_end() {
        let mut items = vec![movable("a"), movable("b"), movable("c")];
        assert!(reorder(&mut items, 0, 2));
        assert_eq!(names(&items), vec!["b", "c", "a"]);

        assert!(reorder(&mut items, 0, 10));
        assert_eq!(names(&items), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_noop_cases() {
        let mut items = vec![movable("a"), movable("b")];
        let before = items.clone();
        assert!(!reorder(&mut items, 1, 1));
        assert!(!reorder(&mut items, 5, 0));
        assert_eq!(items, before);

        let mut single = vec![movable("only")];
        assert!(!reorder(&mut single, 0, 1));
        assert_eq!(names(&single), vec!["only"]);
    }

    #[test]
    fn test_anchor_skips_fixed_items() {
        // 表示位置は x を数えない: [a, b, c]
        let mut items = vec![movable("a"), fixed("x"), movable("b"), movable("c")];
        assert!(reorder(&mut items, 2, 1));
        assert_eq!(names(&items), vec!["a", "x", "c", "b"]);

        assert!(reorder(&mut items, 0, 1));
        // a を取り除くと [x, c, b]、表示位置1は b → b の直前へ
        assert_eq!(names(&items), vec!["x", "c", "a", "b"]);
    }

    #[test]
    fn test_membership_preserved() {
        let mut items: Vec<Item> = ["a", "b", "c", "d", "e"].into_iter().map(movable).collect();
        for (old, new) in [(0, 4), (4, 0), (2, 3), (1, 9), (3, 1)] {
            reorder(&mut items, old, new);
            let mut sorted = names(&items);
            sorted.sort();
            assert_eq!(sorted, vec!["a", "b", "c", "d", "e"]);
        }
    }
}
