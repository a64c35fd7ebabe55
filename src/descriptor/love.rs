use std::io::Write;

use crate::{
    error::Error,
    lua_ast::{Block, Expression, Statement},
};

use super::AtlasDescription;

const TABLE_NAME: &str = "quads";

pub(super) fn render<W: Write>(atlas: &AtlasDescription, mut output: W) -> Result<(), Error> {
    let mut statements = vec![
        Statement::Local {
            name: TABLE_NAME.to_owned(),
            value: Expression::Table,
        },
        Statement::Blank,
    ];

    for sprite in &atlas.sprites {
        let quad = Expression::name("love.graphics.newQuad").call(vec![
            sprite.left.into(),
            sprite.top.into(),
            sprite.width.into(),
            sprite.height.into(),
            atlas.width.into(),
            atlas.height.into(),
        ]);

        statements.push(Statement::Assign {
            target: Expression::name(TABLE_NAME).index(sprite.name.as_str()),
            value: quad,
        });
    }

    statements.push(Statement::Blank);
    statements.push(Statement::Return(Expression::name(TABLE_NAME)));

    write!(output, "{}", Block { statements })?;
    Ok(())
}
