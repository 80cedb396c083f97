use crate::tensor::Tensor;
use std::fmt;

/// 超过该行/列数时只显示首尾各3个
const MAX_SHOWN: usize = 6;

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let shape = self.shape();
        if shape.len() > 2 {
            return writeln!(
                f,
                "<对于阶数大于二（rank>2）的张量（形状：{shape:?}）无法展示具体数据>"
            );
        }
        let (rows, cols) = match shape {
            [] => (1, 1),
            [n] => (1, *n),
            [r, c] => (*r, *c),
            _ => unreachable!(),
        };
        let matrix = self.reshape(&[rows, cols]);
        let shown = |len: usize| -> Vec<Option<usize>> {
            if len > MAX_SHOWN {
                (0..3)
                    .map(Some)
                    .chain(std::iter::once(None))
                    .chain((len - 3..len).map(Some))
                    .collect()
            } else {
                (0..len).map(Some).collect()
            }
        };
        for row in shown(rows) {
            match row {
                Some(i) => {
                    for col in shown(cols) {
                        match col {
                            Some(j) => write!(f, "{:8.4} ", matrix[[i, j]])?,
                            None => write!(f, "   ..  ")?,
                        }
                    }
                    writeln!(f)?;
                }
                None => writeln!(f, "   ..")?,
            }
        }
        writeln!(f, "形状: {shape:?}")
    }
}
